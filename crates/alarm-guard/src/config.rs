//! Checker configuration: the inter-alarm safety buffer and the recurrence horizon.
//!
//! Both values are fixed in shipping builds, but they are passed to
//! [`InterferenceChecker::new`](crate::InterferenceChecker::new) explicitly so
//! tests and embedders can vary them.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{AlarmError, Result};

/// Minimum silent gap kept on both sides of every alarm's firing instant.
pub const DEFAULT_ALARM_START_BUFFER_MINUTES: i64 = 2;

/// Number of occurrences expanded per repetition kind.
///
/// The defaults deliberately exceed 365/52/12 so that an anchor part-way
/// through a period still covers a full year ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceHorizon {
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
}

impl RecurrenceHorizon {
    pub const ONE_YEAR: RecurrenceHorizon = RecurrenceHorizon {
        daily: 367,
        weekly: 54,
        monthly: 13,
    };
}

impl Default for RecurrenceHorizon {
    fn default() -> Self {
        Self::ONE_YEAR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    #[serde(rename = "alarm_start_buffer_minutes", with = "minutes")]
    pub alarm_start_buffer: Duration,
    pub horizon: RecurrenceHorizon,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            alarm_start_buffer: Duration::minutes(DEFAULT_ALARM_START_BUFFER_MINUTES),
            horizon: RecurrenceHorizon::default(),
        }
    }
}

impl GuardConfig {
    pub fn with_buffer(mut self, buffer: Duration) -> Self {
        self.alarm_start_buffer = buffer;
        self
    }

    pub fn with_horizon(mut self, horizon: RecurrenceHorizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Check the invariants the protected-zone arithmetic relies on.
    ///
    /// The buffer must be at least one minute, otherwise a protected zone
    /// would not even cover its own firing minute. Every horizon bucket needs
    /// at least one step so the anchor occurrence is always checked.
    pub fn validate(&self) -> Result<()> {
        if self.alarm_start_buffer < Duration::minutes(1) {
            return Err(AlarmError::InvalidConfig(format!(
                "alarm_start_buffer_minutes must be at least 1 (got {})",
                self.alarm_start_buffer.num_minutes()
            )));
        }
        let h = &self.horizon;
        if h.daily == 0 || h.weekly == 0 || h.monthly == 0 {
            return Err(AlarmError::InvalidConfig(
                "every horizon bucket needs at least one step".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON configuration. Missing fields fall back to the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GuardConfig = serde_json::from_str(json)?;
        config.validate()?;
        tracing::debug!(
            buffer_minutes = config.alarm_start_buffer.num_minutes(),
            daily = config.horizon.daily,
            weekly = config.horizon.weekly,
            monthly = config.horizon.monthly,
            "loaded guard configuration"
        );
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// (De)serialize a [`Duration`] as a whole, non-negative number of minutes.
pub(crate) mod minutes {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_minutes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let minutes = u32::deserialize(deserializer)?;
        Ok(Duration::minutes(i64::from(minutes)))
    }
}
