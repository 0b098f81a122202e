// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A scene load that progresses with the frame clock.
//!
//! Like a real engine, a load that is not allowed to activate stalls at the
//! activation threshold. Once allowed it reports done as soon as its full load
//! time has passed.

use std::cell::Cell;
use std::rc::Rc;

use dwell_engine::config::DEFAULT_ACTIVATION_THRESHOLD;
use dwell_engine::time::clock::FrameClock;
use dwell_engine::types::WaitError;
use dwell_engine::wait_error;
use dwell_engine::waits::load::{AsyncOperation, SceneLoader};
use log::info;

struct LoadState {
    clock: FrameClock,
    started_secs: f64,
    load_secs: f64,
    allow_activation: Cell<bool>,
}

/// Clones share state, so a clone can watch a load owned by a gate.
#[derive(Clone)]
pub struct SimulatedLoad {
    state: Rc<LoadState>,
}

impl SimulatedLoad {
    #[must_use]
    pub fn new(clock: FrameClock, load_secs: f64) -> Self {
        let started_secs = clock.now_secs();
        Self {
            state: Rc::new(LoadState {
                clock,
                started_secs,
                load_secs,
                allow_activation: Cell::new(true),
            }),
        }
    }

    fn loaded_fraction(&self) -> f32 {
        if self.state.load_secs <= 0.0 {
            return 1.0;
        }
        let elapsed = self.state.clock.now_secs() - self.state.started_secs;
        (elapsed / self.state.load_secs).clamp(0.0, 1.0) as f32
    }
}

impl AsyncOperation for SimulatedLoad {
    fn progress(&self) -> f32 {
        let loaded = self.loaded_fraction();
        if self.state.allow_activation.get() {
            loaded
        } else {
            loaded.min(DEFAULT_ACTIVATION_THRESHOLD)
        }
    }

    fn is_done(&self) -> bool {
        self.state.allow_activation.get() && self.loaded_fraction() >= 1.0
    }

    fn set_allow_activation(&mut self, allow: bool) {
        self.state.allow_activation.set(allow);
    }
}

pub struct SimulatedLoader {
    clock: FrameClock,
    load_secs: f64,
}

impl SimulatedLoader {
    #[must_use]
    pub fn new(clock: FrameClock, load_secs: f64) -> Self {
        Self { clock, load_secs }
    }
}

impl SceneLoader for SimulatedLoader {
    type Operation = SimulatedLoad;

    fn load_async(&mut self, scene: &str) -> Result<SimulatedLoad, WaitError> {
        if !(self.load_secs >= 0.0 && self.load_secs.is_finite()) {
            return wait_error!(format!(
                "cannot load '{scene}' in {} seconds",
                self.load_secs
            ));
        }
        info!("Loading '{scene}' over {:.1}s", self.load_secs);
        Ok(SimulatedLoad::new(self.clock.clone(), self.load_secs))
    }
}
