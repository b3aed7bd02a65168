//! Reminder engine configuration, read from TOML.
//!
//! ```toml
//! skincare_model = "fixed_slots"
//! morning_hour = 8
//! evening_hour = 21
//! recheck_interval_secs = 3600
//! auto_request_authorization = true
//! time_zone = "Europe/Berlin"   # IANA name; omit to use the system zone
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chrono_tz::Tz;

use crate::domain::{LocalZone, SlotOfDay};

/// Which skincare reminder model is active. Only one identifier scheme is
/// live at a time so the two models never leave duplicate reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkincareModel {
    /// One reminder per morning/evening slot (`skincare-slot-AM|PM`).
    #[default]
    FixedSlots,
    /// One reminder per product entry (`skincare-<id>`).
    PerProduct,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{slot} reminder hour must be within 0..=23, got {hour}")]
    InvalidHour { slot: SlotOfDay, hour: u32 },

    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub skincare_model: SkincareModel,
    pub morning_hour: u32,
    pub evening_hour: u32,
    /// Period of the background slot re-check. `None` or 0 disables it.
    pub recheck_interval_secs: Option<u64>,
    /// Allow the engine to show the permission prompt (once per process)
    /// before its first scheduling attempt.
    pub auto_request_authorization: bool,
    /// IANA zone the slot hours are read in. `None` uses the system zone.
    pub time_zone: Option<String>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            skincare_model: SkincareModel::default(),
            morning_hour: SlotOfDay::Am.default_reminder_hour(),
            evening_hour: SlotOfDay::Pm.default_reminder_hour(),
            recheck_interval_secs: Some(3600),
            auto_request_authorization: true,
            time_zone: None,
        }
    }
}

impl ReminderConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for slot in SlotOfDay::ALL {
            let hour = self.slot_hour(slot);
            if hour > 23 {
                return Err(ConfigError::InvalidHour { slot, hour });
            }
        }
        self.local_zone()?;
        Ok(())
    }

    pub fn slot_hour(&self, slot: SlotOfDay) -> u32 {
        match slot {
            SlotOfDay::Am => self.morning_hour,
            SlotOfDay::Pm => self.evening_hour,
        }
    }

    pub fn local_zone(&self) -> Result<LocalZone, ConfigError> {
        match &self.time_zone {
            None => Ok(LocalZone::System),
            Some(name) => name
                .parse::<Tz>()
                .map(LocalZone::Named)
                .map_err(|_| ConfigError::UnknownTimeZone(name.clone())),
        }
    }

    pub fn recheck_interval(&self) -> Option<Duration> {
        self.recheck_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
