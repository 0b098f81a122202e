// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Show a splash screen while a scene loads in the background, and only let
//! the scene activate once the splash has been shown for long enough.
//!
//! The waits involved:
//!  - [`WaitMeanwhile`] fades the splash in, frame by frame,
//!  - [`WaitThen`] ends the splash after a fixed time,
//!  - [`LoadGate`] holds the load at the activation threshold until then,
//!  - [`WaitFirstOf`] races the load against a timeout,
//!  - [`WaitForObject`] waits for the spawn point in the new scene,
//!  - [`WaitThenAdvanced`] shows a hint if loading is slow.
//!
//! Everything that happens is announced on an [`EventBus`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dwell_engine::scheduler::Scheduler;
use dwell_engine::task::TaskHandle;
use dwell_engine::types::{WaitError, WaitResult};
use dwell_engine::waits::advanced::WaitThenAdvanced;
use dwell_engine::waits::delay::WaitThen;
use dwell_engine::waits::find::WaitForObject;
use dwell_engine::waits::first_of::WaitFirstOf;
use dwell_engine::waits::load::{AsyncOperation, LoadGate};
use dwell_engine::waits::meanwhile::WaitMeanwhile;
use dwell_events::bus::EventBus;
use log::info;

pub mod load;

use crate::load::SimulatedLoader;

#[derive(Clone, Debug)]
pub struct SceneSettings {
    pub scene: String,
    pub load_secs: f64,
    pub splash_secs: f64,
    pub fade_secs: f64,
    pub hint_secs: f64,
    pub timeout_secs: f64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            scene: "level-1".to_string(),
            load_secs: 2.0,
            splash_secs: 3.0,
            fade_secs: 0.5,
            hint_secs: 1.0,
            timeout_secs: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug)]
pub struct Report {
    /// Everything announced, in order.
    pub events: Vec<String>,

    /// Frames taken.
    pub ticks: u64,

    /// Seconds taken.
    pub secs: f64,

    /// How far the splash had faded in when the run ended.
    pub fade: f64,
}

/// Raise `event` on `bus`, converting listener errors into wait errors.
fn announce(bus: &EventBus<String>, event: &str) -> WaitResult {
    bus.invoke(&[event.to_string()])?;
    Ok(())
}

/// Run the scene gate to completion on `scheduler`.
pub fn run_scene_gate(
    scheduler: &Scheduler,
    settings: &SceneSettings,
) -> Result<Report, WaitError> {
    let interval = scheduler.config().default_interval_secs;
    let bus: EventBus<String> = EventBus::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    {
        let events = events.clone();
        let clock = scheduler.clock();
        bus.add_fn(move |args| {
            for event in args {
                info!("{}: {event}", clock.time_now());
                events.borrow_mut().push(event.clone());
            }
            Ok(())
        });
    }

    let fade = Rc::new(Cell::new(0.0));
    {
        let fade = fade.clone();
        let fade_secs = settings.fade_secs;
        scheduler.spawn_named(
            "fade_in",
            WaitMeanwhile::new(move |delta| {
                let level = if fade_secs > 0.0 {
                    (fade.get() + delta / fade_secs).min(1.0)
                } else {
                    1.0
                };
                fade.set(level);
                level >= 1.0
            }),
        );
    }

    let splash_done = Rc::new(Cell::new(false));
    {
        let splash_done = splash_done.clone();
        let bus = bus.clone();
        scheduler.spawn_named(
            "splash",
            WaitThen::new(settings.splash_secs).then(move || {
                splash_done.set(true);
                announce(&bus, "splash done")
            }),
        );
    }

    let mut loader = SimulatedLoader::new(scheduler.clock(), settings.load_secs);
    let gate = {
        let splash_done = splash_done.clone();
        let bus = bus.clone();
        LoadGate::start(
            &mut loader,
            &settings.scene,
            move || splash_done.get(),
            interval,
        )?
        .with_threshold(scheduler.config().activation_threshold)?
        .then(move || announce(&bus, "scene activated"))
    };
    let load = gate.operation().clone();
    let gate_handle = scheduler.spawn(gate);

    let spawn_point = {
        let load = load.clone();
        let bus = bus.clone();
        WaitForObject::new(
            move || load.is_done().then_some(SpawnPoint { x: 4, y: 2 }),
            interval,
        )
        .then(move |point| {
            announce(&bus, &format!("player spawned at ({}, {})", point.x, point.y))
        })
    };
    let spawn_point_handle = scheduler.spawn(spawn_point);

    // A timeout abandons whatever is still waiting on the load
    let to_cancel: Rc<[TaskHandle]> = Rc::new([gate_handle, spawn_point_handle]);
    {
        let loaded = load.clone();
        let clock = scheduler.clock();
        let deadline = scheduler.now_secs() + settings.timeout_secs;
        let on_ready = bus.clone();
        let on_timeout = bus.clone();
        let to_cancel = to_cancel.clone();
        scheduler.spawn_named(
            "race",
            WaitFirstOf::new(interval)
                .branch(move || loaded.is_done(), move || announce(&on_ready, "ready"))
                .branch(
                    move || clock.now_secs() >= deadline,
                    move || {
                        for handle in to_cancel.iter() {
                            handle.cancel();
                        }
                        announce(&on_timeout, "timed out")
                    },
                ),
        );
    }

    {
        let still_loading = load.clone();
        let loaded = load.clone();
        let bus = bus.clone();
        let hint_load = load.clone();
        scheduler.spawn_named(
            "hint",
            WaitThenAdvanced::new(
                settings.hint_secs,
                move || !still_loading.is_done(),
                move || loaded.is_done(),
                interval,
            )
            .then(move || {
                if hint_load.is_done() {
                    Ok(())
                } else {
                    announce(&bus, "hint shown")
                }
            }),
        );
    }

    let ticks = scheduler.run_until_idle()?;
    let events = events.borrow().clone();
    Ok(Report {
        events,
        ticks,
        secs: scheduler.now_secs(),
        fade: fade.get(),
    })
}
