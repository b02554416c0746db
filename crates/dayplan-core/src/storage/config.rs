//! TOML-based application configuration.
//!
//! Stores the fixed-strategy parameters and the default planning mode.
//! Configuration is stored at `~/.config/dayplan/config.toml`; every
//! field has a serde default so partial files keep working.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::breaks::{EyeHealthParams, PlanMode, PomodoroParams};
use crate::error::StorageError;

/// Fixed break-strategy parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_pomodoro_work")]
    pub pomodoro_work: i64,
    #[serde(default = "default_pomodoro_short_break")]
    pub pomodoro_short_break: i64,
    #[serde(default = "default_pomodoro_long_break")]
    pub pomodoro_long_break: i64,
    #[serde(default = "default_pomodoros_before_long_break")]
    pub pomodoros_before_long_break: u32,
    #[serde(default = "default_eye_work")]
    pub eye_work: i64,
    #[serde(default = "default_eye_break")]
    pub eye_break: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            pomodoro_work: default_pomodoro_work(),
            pomodoro_short_break: default_pomodoro_short_break(),
            pomodoro_long_break: default_pomodoro_long_break(),
            pomodoros_before_long_break: default_pomodoros_before_long_break(),
            eye_work: default_eye_work(),
            eye_break: default_eye_break(),
        }
    }
}

impl ScheduleConfig {
    /// Pomodoro parameters for the placement engine.
    pub fn pomodoro_params(&self) -> PomodoroParams {
        PomodoroParams {
            work_minutes: self.pomodoro_work,
            short_break: self.pomodoro_short_break,
            long_break: self.pomodoro_long_break,
            long_every: self.pomodoros_before_long_break,
        }
    }

    /// Eye-health parameters for the placement engine.
    pub fn eye_params(&self) -> EyeHealthParams {
        EyeHealthParams {
            work_minutes: self.eye_work,
            break_minutes: self.eye_break,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayplan/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Planning mode used when none is given on the command line.
    #[serde(default)]
    pub default_mode: PlanMode,
    /// Calendar to read commitments from and write plans to.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            default_mode: PlanMode::default(),
            calendar_id: default_calendar_id(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, StorageError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file does
    /// not exist yet.
    pub fn load() -> Result<Self, StorageError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| StorageError::ConfigLoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| StorageError::ConfigLoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), StorageError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| StorageError::ConfigSaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| StorageError::ConfigSaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

fn default_pomodoro_work() -> i64 {
    25
}
fn default_pomodoro_short_break() -> i64 {
    5
}
fn default_pomodoro_long_break() -> i64 {
    15
}
fn default_pomodoros_before_long_break() -> u32 {
    4
}
fn default_eye_work() -> i64 {
    20
}
fn default_eye_break() -> i64 {
    5
}
fn default_calendar_id() -> String {
    "primary".to_string()
}
