// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Scheduler configuration.
//!
//! Settings are layered with [Figment](https://docs.rs/figment): the built-in
//! defaults, then an optional TOML file, then environment variables prefixed
//! with `DWELL_` (for example `DWELL_TICK_RATE_HZ=30`). Later layers override
//! earlier ones.
//!
//! ```toml
//! tick_rate_hz = 30.0
//! max_ticks = 5000
//! default_interval_secs = 0.25
//! activation_threshold = 0.9
//! log_level = "debug"
//! ```

use std::path::Path;
use std::str::FromStr;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::types::{WaitError, WaitResult};
use crate::wait_error;

/// Prefix of the environment variables read by [`SchedulerConfig::load`].
pub const ENV_PREFIX: &str = "DWELL_";

/// Progress at which a load is ready to be activated.
pub const DEFAULT_ACTIVATION_THRESHOLD: f32 = 0.9;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Frames per second used when the scheduler runs on its own.
    pub tick_rate_hz: f64,

    /// Upper bound on the number of frames a run may take.
    pub max_ticks: u64,

    /// Poll interval for waits that are not given one explicitly.
    pub default_interval_secs: f64,

    /// Progress a load has to reach before it may be activated.
    pub activation_threshold: f32,

    /// Level for log messages (`error`, `warn`, `info`, `debug`, `trace` or
    /// `off`).
    pub log_level: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            max_ticks: 100_000,
            default_interval_secs: 0.1,
            activation_threshold: DEFAULT_ACTIVATION_THRESHOLD,
            log_level: "warn".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// The layered configuration sources, before extraction.
    ///
    /// Callers can merge further providers (such as command-line overrides)
    /// before passing the result to [`SchedulerConfig::from_figment`].
    pub fn figment(conf_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = conf_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load defaults, `conf_file` (if given) and the environment.
    pub fn load(conf_file: Option<&Path>) -> Result<Self, WaitError> {
        Self::from_figment(Self::figment(conf_file))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, WaitError> {
        let config: Self = figment
            .extract()
            .map_err(|e| WaitError(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WaitResult {
        if !(self.tick_rate_hz > 0.0 && self.tick_rate_hz.is_finite()) {
            return wait_error!(format!(
                "tick_rate_hz must be positive, got {}",
                self.tick_rate_hz
            ));
        }
        if self.max_ticks == 0 {
            return wait_error!("max_ticks must be at least 1");
        }
        if !(self.default_interval_secs >= 0.0 && self.default_interval_secs.is_finite()) {
            return wait_error!(format!(
                "default_interval_secs must not be negative, got {}",
                self.default_interval_secs
            ));
        }
        if !(0.0..=1.0).contains(&self.activation_threshold) {
            return wait_error!(format!(
                "activation_threshold must be in [0, 1], got {}",
                self.activation_threshold
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    /// Duration of one frame at [`tick_rate_hz`](Self::tick_rate_hz).
    pub fn tick_delta_secs(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }

    /// Take the configured string and convert it to a level filter.
    pub fn level_filter(&self) -> Result<log::LevelFilter, WaitError> {
        log::LevelFilter::from_str(&self.log_level)
            .map_err(|_| WaitError(format!("unable to parse level string '{}'", self.log_level)))
    }
}
