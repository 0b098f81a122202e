// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Poll a lookup until it finds an object, then pass the object to a
//! callback.
//!
//! Each poll calls the lookup and then sleeps for the interval. The callback
//! runs when the task resumes after the poll that found the object, so even
//! an object that exists from the start is delivered one interval later.

use crate::task::{Progress, Resume, StepContext, TaskState, WaitTask};
use crate::types::{ThenWith, WaitError, WaitResult};

pub struct WaitForObject<T> {
    find: Box<dyn FnMut() -> Option<T>>,
    interval_secs: f64,
    found: Option<T>,
    then: Option<ThenWith<T>>,
    progress: Progress,
}

impl<T> WaitForObject<T>
where
    T: 'static,
{
    #[must_use]
    pub fn new(find: impl FnMut() -> Option<T> + 'static, interval_secs: f64) -> Self {
        Self {
            find: Box::new(find),
            interval_secs,
            found: None,
            then: None,
            progress: Progress::new(),
        }
    }

    /// Run `then` with the object that was found.
    #[must_use]
    pub fn then(mut self, then: impl FnOnce(T) -> WaitResult + 'static) -> Self {
        self.then = Some(Box::new(then));
        self
    }
}

impl<T> WaitTask for WaitForObject<T> {
    fn name(&self) -> &str {
        "wait_for_object"
    }

    fn state(&self) -> TaskState {
        self.progress.state()
    }

    fn step(&mut self, _cx: &StepContext) -> Result<Resume, WaitError> {
        self.progress.ensure_running(self.name())?;
        if let Some(object) = self.found.take() {
            let then = self.then.take().map(|then| move || then(object));
            return self.progress.complete(then);
        }

        self.found = (self.find)();
        Ok(Resume::Sleep(self.interval_secs))
    }
}
