// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Wait for a duration with an early exit and a check once the duration has
//! passed.
//!
//! Each cycle runs strictly in this order:
//!
//!  1. if `exit_early()` is true, run the callback and stop;
//!  2. sleep for the interval and add the interval to the time waited;
//!  3. if more than `duration_secs` has been waited and `check_after()` is
//!     true, run the callback and stop.
//!
//! `check_after` is never sampled before the duration has passed. If neither
//! predicate ever becomes true the wait never ends.

use crate::task::{Progress, Resume, StepContext, TaskState, WaitTask};
use crate::types::{Predicate, Then, WaitError, WaitResult};

pub struct WaitThenAdvanced {
    duration_secs: f64,
    interval_secs: f64,
    check_after: Predicate,
    exit_early: Predicate,
    secs_waited: f64,
    sleeping: bool,
    then: Option<Then>,
    progress: Progress,
}

impl WaitThenAdvanced {
    #[must_use]
    pub fn new(
        duration_secs: f64,
        check_after: impl FnMut() -> bool + 'static,
        exit_early: impl FnMut() -> bool + 'static,
        interval_secs: f64,
    ) -> Self {
        Self {
            duration_secs,
            interval_secs,
            check_after: Box::new(check_after),
            exit_early: Box::new(exit_early),
            secs_waited: 0.0,
            sleeping: false,
            then: None,
            progress: Progress::new(),
        }
    }

    /// Run `then` when either exit path is taken.
    #[must_use]
    pub fn then(mut self, then: impl FnOnce() -> WaitResult + 'static) -> Self {
        self.then = Some(Box::new(then));
        self
    }

    /// Time waited so far, counted in whole intervals.
    #[must_use]
    pub fn secs_waited(&self) -> f64 {
        self.secs_waited
    }
}

impl WaitTask for WaitThenAdvanced {
    fn name(&self) -> &str {
        "wait_then_advanced"
    }

    fn state(&self) -> TaskState {
        self.progress.state()
    }

    fn step(&mut self, _cx: &StepContext) -> Result<Resume, WaitError> {
        self.progress.ensure_running(self.name())?;

        if self.sleeping {
            self.sleeping = false;
            self.secs_waited += self.interval_secs;
            if self.secs_waited > self.duration_secs && (self.check_after)() {
                return self.progress.complete(self.then.take());
            }
        }

        if (self.exit_early)() {
            return self.progress.complete(self.then.take());
        }

        self.sleeping = true;
        Ok(Resume::Sleep(self.interval_secs))
    }
}
