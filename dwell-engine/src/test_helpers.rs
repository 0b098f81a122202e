// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Helpers shared by the tests of this crate and of crates built on it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::SchedulerConfig;
use crate::scheduler::Scheduler;
use crate::waits::load::AsyncOperation;

/// Create a scheduler ticking at 1Hz so that one tick is one second.
#[must_use]
pub fn start_test() -> Scheduler {
    Scheduler::new(SchedulerConfig {
        tick_rate_hz: 1.0,
        max_ticks: 1000,
        ..SchedulerConfig::default()
    })
}

#[derive(Debug, Default)]
struct ManualLoadState {
    progress: f32,
    done: bool,
    allow_activation: bool,
    activation_history: Vec<bool>,
}

/// An [`AsyncOperation`] whose progress is set by the test.
///
/// Clones share state, so the test keeps a clone to drive the load and
/// inspect what the gate did to it.
#[derive(Clone, Debug, Default)]
pub struct ManualLoad {
    state: Rc<RefCell<ManualLoadState>>,
}

impl ManualLoad {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_progress(&self, progress: f32) {
        self.state.borrow_mut().progress = progress;
    }

    pub fn finish(&self) {
        let mut state = self.state.borrow_mut();
        state.progress = 1.0;
        state.done = true;
    }

    #[must_use]
    pub fn allow_activation(&self) -> bool {
        self.state.borrow().allow_activation
    }

    /// Every value passed to `set_allow_activation`, in order.
    #[must_use]
    pub fn activation_history(&self) -> Vec<bool> {
        self.state.borrow().activation_history.clone()
    }
}

impl AsyncOperation for ManualLoad {
    fn progress(&self) -> f32 {
        self.state.borrow().progress
    }

    fn is_done(&self) -> bool {
        self.state.borrow().done
    }

    fn set_allow_activation(&mut self, allow: bool) {
        let mut state = self.state.borrow_mut();
        state.allow_activation = allow;
        state.activation_history.push(allow);
    }
}
