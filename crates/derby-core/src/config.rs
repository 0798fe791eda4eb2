//! Configuration for race simulation runs
//!
//! Every knob has a default matching the reference race (1000-unit track,
//! 50-wide bonus zone, +100 bonus after a 7-unit hold), so an empty or
//! missing config file yields a fully playable setup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{DerbyError, Result};

/// Race configuration, loadable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Total distance a competitor must cover to finish
    #[serde(default = "default_total_distance")]
    pub total_distance: u64,

    /// Width of the bonus zone
    #[serde(default = "default_bonus_zone_width")]
    pub bonus_zone_width: u64,

    /// Distance granted by one bonus application
    #[serde(default = "default_bonus_distance")]
    pub bonus_distance: u64,

    /// How many time units the bonus lock is held per application
    #[serde(default = "default_bonus_hold_units")]
    pub bonus_hold_units: u32,

    /// Velocity and stamina are drawn uniformly from 1..=param_max
    #[serde(default = "default_param_max")]
    pub param_max: u32,

    /// Rest draws are uniform in 1..=rest_draw_max, reduced by stamina
    #[serde(default = "default_rest_draw_max")]
    pub rest_draw_max: u32,

    /// Wall-clock milliseconds per simulated time unit
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,

    /// Reporter status-line cadence in milliseconds
    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,

    /// Master seed; per-competitor seeds derive from it. None = OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Whether the live status line reporter runs
    #[serde(default = "default_live_status")]
    pub live_status: bool,
}

// Default value providers
fn default_total_distance() -> u64 {
    1000
}

fn default_bonus_zone_width() -> u64 {
    50
}

fn default_bonus_distance() -> u64 {
    100
}

fn default_bonus_hold_units() -> u32 {
    7
}

fn default_param_max() -> u32 {
    3
}

fn default_rest_draw_max() -> u32 {
    5
}

fn default_time_unit_ms() -> u64 {
    100
}

fn default_status_interval_ms() -> u64 {
    250
}

fn default_live_status() -> bool {
    true
}

impl RaceConfig {
    /// Load configuration from a TOML file, or use defaults when no path is
    /// given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content).map_err(|e| {
                    DerbyError::Config(format!("Failed to parse config file: {}", e))
                })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.total_distance == 0 {
            return Err(DerbyError::Config("total_distance must be positive".into()));
        }
        if self.bonus_zone_width > self.total_distance {
            return Err(DerbyError::Config(format!(
                "bonus_zone_width {} exceeds total_distance {}",
                self.bonus_zone_width, self.total_distance
            )));
        }
        if self.param_max == 0 {
            return Err(DerbyError::Config("param_max must be at least 1".into()));
        }
        if self.rest_draw_max == 0 {
            return Err(DerbyError::Config("rest_draw_max must be at least 1".into()));
        }
        Ok(())
    }

    /// Wall-clock duration of one simulated time unit.
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// How long the bonus lock is held per application.
    pub fn bonus_hold(&self) -> Duration {
        self.time_unit() * self.bonus_hold_units
    }

    /// Reporter tick interval.
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            total_distance: default_total_distance(),
            bonus_zone_width: default_bonus_zone_width(),
            bonus_distance: default_bonus_distance(),
            bonus_hold_units: default_bonus_hold_units(),
            param_max: default_param_max(),
            rest_draw_max: default_rest_draw_max(),
            time_unit_ms: default_time_unit_ms(),
            status_interval_ms: default_status_interval_ms(),
            seed: None,
            live_status: default_live_status(),
        }
    }
}
