// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Gate a simulated scene load behind a splash screen.
//!
//! For latest usage run:
//! ```bash
//! cargo run --bin scene-gate -- --help
//! ```
//!
//! # Example
//!
//! Load for 5 seconds behind a 2 second splash, logging every event:
//! ```bash
//! $ cargo run --bin scene-gate -- --load-secs 5 --splash-secs 2 --log-level info
//! ```
//!
//! Scheduler settings can also come from a TOML file given with `--config` or
//! from `DWELL_` environment variables. Command-line flags take precedence.

use std::path::PathBuf;

use clap::Parser;
use dwell_engine::config::SchedulerConfig;
use dwell_engine::scheduler::Scheduler;
use dwell_engine::types::WaitError;
use figment::providers::Serialized;
use scene_gate::{SceneSettings, run_scene_gate};
use serde::Serialize;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Example application gating a scene load behind a splash screen")]
struct Cli {
    /// Path to a TOML file of scheduler settings
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    /// The scene to load
    #[arg(long, default_value = "level-1")]
    scene: String,

    /// Seconds the load takes
    #[arg(long, default_value = "2.0")]
    load_secs: f64,

    /// Seconds the splash screen is shown for
    #[arg(long, default_value = "3.0")]
    splash_secs: f64,

    /// Seconds before giving up on the load
    #[arg(long, default_value = "10.0")]
    timeout_secs: f64,
}

/// Scheduler settings that can be given on the command line.
#[derive(clap::Args, Serialize)]
struct Overrides {
    /// Frames per second
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    tick_rate_hz: Option<f64>,

    /// Level for log messages
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,

    /// Upper bound on the number of frames
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_ticks: Option<u64>,
}

fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off) // No timestamps are printed
        .set_thread_level(LevelFilter::Off) // No thread information is printed
        .set_target_level(LevelFilter::Off) // No target is printed
        .build();
    if TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        eprintln!("A logger has already been installed");
    }
}

fn main() -> Result<(), WaitError> {
    let cli = Cli::parse();

    let figment = SchedulerConfig::figment(cli.config.as_deref())
        .merge(Serialized::defaults(&cli.overrides));
    let config = SchedulerConfig::from_figment(figment)?;
    init_logging(config.level_filter()?);

    let settings = SceneSettings {
        scene: cli.scene,
        load_secs: cli.load_secs,
        splash_secs: cli.splash_secs,
        timeout_secs: cli.timeout_secs,
        ..SceneSettings::default()
    };

    let scheduler = Scheduler::new(config);
    let report = run_scene_gate(&scheduler, &settings)?;

    for event in &report.events {
        println!("{event}");
    }
    println!(
        "Finished after {} frames ({:.2}s)",
        report.ticks, report.secs
    );
    Ok(())
}
