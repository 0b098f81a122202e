// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use dwell_engine::config::SchedulerConfig;
use dwell_engine::scheduler::Scheduler;
use dwell_engine::waits::load::{AsyncOperation, SceneLoader};
use scene_gate::load::SimulatedLoader;
use scene_gate::{SceneSettings, run_scene_gate};

#[test]
fn scene_activates_after_splash() {
    let scheduler = Scheduler::default();
    let settings = SceneSettings::default();
    let report = run_scene_gate(&scheduler, &settings).unwrap();

    assert_eq!(
        report.events,
        vec![
            "hint shown",
            "splash done",
            "scene activated",
            "player spawned at (4, 2)",
            "ready",
        ]
    );
    assert!(report.secs > settings.splash_secs);
    assert!(report.secs < settings.timeout_secs);
    approx::assert_abs_diff_eq!(report.fade, 1.0);
}

#[test]
fn slow_load_times_out() {
    let scheduler = Scheduler::default();
    let settings = SceneSettings {
        load_secs: 100.0,
        timeout_secs: 5.0,
        ..SceneSettings::default()
    };
    let report = run_scene_gate(&scheduler, &settings).unwrap();

    assert_eq!(report.events, vec!["hint shown", "splash done", "timed out"]);
    assert!(report.secs >= 5.0);
    assert!(report.secs < 6.0);
}

#[test]
fn fast_load_skips_hint() {
    let scheduler = Scheduler::new(SchedulerConfig {
        tick_rate_hz: 10.0,
        ..SchedulerConfig::default()
    });
    let settings = SceneSettings {
        load_secs: 0.5,
        splash_secs: 0.5,
        hint_secs: 5.0,
        ..SceneSettings::default()
    };
    let report = run_scene_gate(&scheduler, &settings).unwrap();

    assert!(!report.events.iter().any(|e| e == "hint shown"));
    assert!(report.events.iter().any(|e| e == "ready"));
}

#[test]
fn bad_load_time_rejected() {
    let scheduler = Scheduler::default();
    let settings = SceneSettings {
        load_secs: -1.0,
        ..SceneSettings::default()
    };
    match run_scene_gate(&scheduler, &settings) {
        Ok(_) => panic!("Expected an error!"),
        Err(e) => assert_eq!(format!("{e}"), "Error: cannot load 'level-1' in -1 seconds"),
    }
}

#[test]
fn load_stalls_until_allowed() {
    let scheduler = Scheduler::new(SchedulerConfig {
        tick_rate_hz: 1.0,
        ..SchedulerConfig::default()
    });
    let mut loader = SimulatedLoader::new(scheduler.clock(), 2.0);
    let mut load = loader.load_async("level-1").unwrap();
    load.set_allow_activation(false);

    scheduler.run_for(4).unwrap();
    approx::assert_abs_diff_eq!(load.progress(), 0.9);
    assert!(!load.is_done());

    load.set_allow_activation(true);
    approx::assert_abs_diff_eq!(load.progress(), 1.0);
    assert!(load.is_done());
}
