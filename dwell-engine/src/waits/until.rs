// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Poll a predicate until it returns `true`.
//!
//! The predicate is sampled before every suspension, so a predicate that is
//! already true completes on the first step without sleeping at all.

use crate::task::{Progress, Resume, StepContext, TaskState, WaitTask};
use crate::types::{Predicate, Then, WaitError, WaitResult};

pub struct WaitUntil {
    predicate: Predicate,
    interval_secs: f64,
    then: Option<Then>,
    progress: Progress,
}

impl WaitUntil {
    #[must_use]
    pub fn new(predicate: impl FnMut() -> bool + 'static, interval_secs: f64) -> Self {
        Self {
            predicate: Box::new(predicate),
            interval_secs,
            then: None,
            progress: Progress::new(),
        }
    }

    /// Run `then` once the predicate has returned `true`.
    #[must_use]
    pub fn then(mut self, then: impl FnOnce() -> WaitResult + 'static) -> Self {
        self.then = Some(Box::new(then));
        self
    }
}

impl WaitTask for WaitUntil {
    fn name(&self) -> &str {
        "wait_until"
    }

    fn state(&self) -> TaskState {
        self.progress.state()
    }

    fn step(&mut self, _cx: &StepContext) -> Result<Resume, WaitError> {
        self.progress.ensure_running(self.name())?;
        if (self.predicate)() {
            self.progress.complete(self.then.take())
        } else {
            Ok(Resume::Sleep(self.interval_secs))
        }
    }
}
