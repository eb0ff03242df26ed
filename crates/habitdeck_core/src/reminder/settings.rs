//! Daily reminder settings.
//!
//! # Invariants
//! - `time` is always a valid 24h wall-clock time; it serializes as `HH:MM`.
//! - Defaults are: disabled, `09:00`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid reminder time regex"));

/// Wall-clock time of day for the daily reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ReminderTimeError> {
        if hour > 23 || minute > 59 {
            return Err(ReminderTimeError::OutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        Self { hour: 9, minute: 0 }
    }
}

impl Display for ReminderTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = ReminderTimeError;

    /// Accepts `H:MM` or `HH:MM`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let captures = TIME_RE
            .captures(trimmed)
            .ok_or_else(|| ReminderTimeError::Malformed(trimmed.to_string()))?;
        let hour = captures[1]
            .parse::<u8>()
            .map_err(|_| ReminderTimeError::Malformed(trimmed.to_string()))?;
        let minute = captures[2]
            .parse::<u8>()
            .map_err(|_| ReminderTimeError::Malformed(trimmed.to_string()))?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = ReminderTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReminderTime> for String {
    fn from(value: ReminderTime) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderTimeError {
    Malformed(String),
    OutOfRange { hour: u8, minute: u8 },
}

impl Display for ReminderTimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "reminder time `{value}` is not HH:MM"),
            Self::OutOfRange { hour, minute } => {
                write!(f, "reminder time {hour}:{minute:02} is out of range")
            }
        }
    }
}

impl Error for ReminderTimeError {}

/// Persisted as `{ "enabled": bool, "time": "HH:MM" }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub time: ReminderTime,
}

/// Partial update applied on top of current settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderSettingsPatch {
    pub enabled: Option<bool>,
    pub time: Option<ReminderTime>,
}

impl ReminderSettings {
    pub fn merged(self, patch: ReminderSettingsPatch) -> Self {
        Self {
            enabled: patch.enabled.unwrap_or(self.enabled),
            time: patch.time.unwrap_or(self.time),
        }
    }
}
