// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Wait for a fixed time, then run a callback.

use crate::task::{Progress, Resume, StepContext, TaskState, WaitTask};
use crate::types::{Then, WaitError, WaitResult};

pub struct WaitThen {
    duration_secs: f64,
    slept: bool,
    then: Option<Then>,
    progress: Progress,
}

impl WaitThen {
    #[must_use]
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            slept: false,
            then: None,
            progress: Progress::new(),
        }
    }

    /// Run `then` once the delay has passed.
    #[must_use]
    pub fn then(mut self, then: impl FnOnce() -> WaitResult + 'static) -> Self {
        self.then = Some(Box::new(then));
        self
    }
}

impl WaitTask for WaitThen {
    fn name(&self) -> &str {
        "wait_then"
    }

    fn state(&self) -> TaskState {
        self.progress.state()
    }

    fn step(&mut self, _cx: &StepContext) -> Result<Resume, WaitError> {
        self.progress.ensure_running(self.name())?;
        if self.slept {
            self.progress.complete(self.then.take())
        } else {
            self.slept = true;
            Ok(Resume::Sleep(self.duration_secs))
        }
    }
}
