// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Evaluate a predicate every tick, passing it the frame delta, until it
//! returns `true`.
//!
//! Useful for work that has to happen every frame while waiting, such as a
//! fade that advances by the frame time.

use crate::task::{Progress, Resume, StepContext, TaskState, WaitTask};
use crate::types::{WaitError, WaitResult};

pub struct WaitMeanwhile {
    predicate: Box<dyn FnMut(f64) -> bool>,
    progress: Progress,
}

impl WaitMeanwhile {
    #[must_use]
    pub fn new(predicate: impl FnMut(f64) -> bool + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
            progress: Progress::new(),
        }
    }
}

impl WaitTask for WaitMeanwhile {
    fn name(&self) -> &str {
        "wait_meanwhile"
    }

    fn state(&self) -> TaskState {
        self.progress.state()
    }

    fn step(&mut self, cx: &StepContext) -> Result<Resume, WaitError> {
        self.progress.ensure_running(self.name())?;
        if (self.predicate)(cx.delta_secs()) {
            self.progress.complete(None::<fn() -> WaitResult>)
        } else {
            Ok(Resume::NextTick)
        }
    }
}
