// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Gate the activation of an asynchronous load.
//!
//! The host starts a load (typically of a scene) that stops short of
//! activating until it is allowed to. The gate polls the load every interval:
//! on any poll where the load's progress has reached the activation threshold
//! *and* the activation predicate returns `true`, the load is allowed to
//! activate. The gate keeps polling until the load reports that it is done.
//!
//! The activation predicate is not sampled while progress is below the
//! threshold.

use log::debug;

use crate::config::DEFAULT_ACTIVATION_THRESHOLD;
use crate::task::{Progress, Resume, StepContext, TaskState, WaitTask};
use crate::types::{Predicate, Then, WaitError, WaitResult};
use crate::wait_error;

/// An asynchronous operation owned by the host.
pub trait AsyncOperation {
    /// Progress in the range `[0, 1]`.
    fn progress(&self) -> f32;

    fn is_done(&self) -> bool;

    /// Allow or prevent the operation from activating once loaded.
    fn set_allow_activation(&mut self, allow: bool);
}

/// Starts asynchronous loads by name.
pub trait SceneLoader {
    type Operation: AsyncOperation;

    fn load_async(&mut self, scene: &str) -> Result<Self::Operation, WaitError>;
}

pub struct LoadGate<O> {
    operation: O,
    activate_when: Predicate,
    interval_secs: f64,
    threshold: f32,
    activated: bool,
    then: Option<Then>,
    progress: Progress,
}

impl<O> LoadGate<O>
where
    O: AsyncOperation,
{
    /// Gate an operation that has already been started.
    ///
    /// Activation is disallowed straight away so the operation cannot activate
    /// before the gate allows it.
    #[must_use]
    pub fn new(
        mut operation: O,
        activate_when: impl FnMut() -> bool + 'static,
        interval_secs: f64,
    ) -> Self {
        operation.set_allow_activation(false);
        Self {
            operation,
            activate_when: Box::new(activate_when),
            interval_secs,
            threshold: DEFAULT_ACTIVATION_THRESHOLD,
            activated: false,
            then: None,
            progress: Progress::new(),
        }
    }

    /// Start loading `scene` through `loader` and gate the resulting operation.
    pub fn start<L>(
        loader: &mut L,
        scene: &str,
        activate_when: impl FnMut() -> bool + 'static,
        interval_secs: f64,
    ) -> Result<Self, WaitError>
    where
        L: SceneLoader<Operation = O>,
    {
        debug!("load_gate: loading '{scene}'");
        let operation = loader.load_async(scene)?;
        Ok(Self::new(operation, activate_when, interval_secs))
    }

    /// Progress required before activation is considered, in `[0, 1]`.
    pub fn with_threshold(mut self, threshold: f32) -> Result<Self, WaitError> {
        if !(0.0..=1.0).contains(&threshold) {
            return wait_error!(format!(
                "load_gate: activation threshold must be in [0, 1], got {threshold}"
            ));
        }
        self.threshold = threshold;
        Ok(self)
    }

    /// Run `then` once the operation reports that it is done.
    #[must_use]
    pub fn then(mut self, then: impl FnOnce() -> WaitResult + 'static) -> Self {
        self.then = Some(Box::new(then));
        self
    }

    pub fn operation(&self) -> &O {
        &self.operation
    }
}

impl<O> WaitTask for LoadGate<O>
where
    O: AsyncOperation,
{
    fn name(&self) -> &str {
        "load_gate"
    }

    fn state(&self) -> TaskState {
        self.progress.state()
    }

    fn step(&mut self, cx: &StepContext) -> Result<Resume, WaitError> {
        self.progress.ensure_running(self.name())?;
        if self.operation.is_done() {
            return self.progress.complete(self.then.take());
        }

        if self.operation.progress() >= self.threshold && (self.activate_when)() {
            if !self.activated {
                debug!(
                    "load_gate: activation allowed at {:.0}% ({})",
                    self.operation.progress() * 100.0,
                    cx.time_now()
                );
            }
            self.activated = true;
            self.operation.set_allow_activation(true);
        }
        Ok(Resume::Sleep(self.interval_secs))
    }
}
