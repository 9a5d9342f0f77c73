//! Alarm records as seen by the interference checker.
//!
//! Alarms are immutable values. Editing an alarm produces a new value that
//! keeps the same [`AlarmId`]; the id, never the start time, is what the
//! checker uses to leave the alarm being edited out of its own conflict scan.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{minutes, RecurrenceHorizon};
use crate::error::{AlarmError, Result};
use crate::recurrence::Occurrences;

/// Stable identity of a scheduled alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(Uuid);

impl AlarmId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AlarmId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AlarmId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for AlarmId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How often an alarm fires again after its first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repetition {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Repetition::None => "none",
            Repetition::Daily => "daily",
            Repetition::Weekly => "weekly",
            Repetition::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(default)]
    id: AlarmId,
    #[serde(deserialize_with = "minute_precision::deserialize")]
    start: NaiveDateTime,
    #[serde(default)]
    is_light_alarm: bool,
    #[serde(default = "Duration::zero", rename = "light_alarm_minutes", with = "minutes")]
    light_alarm_duration: Duration,
    #[serde(default)]
    repetition: Repetition,
    #[serde(default = "Duration::zero", rename = "snooze_minutes", with = "minutes")]
    snooze_duration: Duration,
}

impl Alarm {
    /// A one-off alarm without light alarm or snooze, firing at `start`.
    ///
    /// Seconds are dropped; alarms are scheduled at minute precision.
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            id: AlarmId::new(),
            start: crate::clock::truncate_to_minute(start),
            is_light_alarm: false,
            light_alarm_duration: Duration::zero(),
            repetition: Repetition::None,
            snooze_duration: Duration::zero(),
        }
    }

    pub fn with_id(mut self, id: AlarmId) -> Self {
        self.id = id;
        self
    }

    /// Enable the light alarm with the given lead-in.
    pub fn with_light_alarm(mut self, duration: Duration) -> Result<Self> {
        self.light_alarm_duration = non_negative("light_alarm_duration", duration)?;
        self.is_light_alarm = true;
        Ok(self)
    }

    /// Keep the configured lead-in but switch the light alarm on or off.
    pub fn light_alarm_enabled(mut self, enabled: bool) -> Self {
        self.is_light_alarm = enabled;
        self
    }

    pub fn with_snooze(mut self, duration: Duration) -> Result<Self> {
        self.snooze_duration = non_negative("snooze_duration", duration)?;
        Ok(self)
    }

    pub fn repeating(mut self, repetition: Repetition) -> Self {
        self.repetition = repetition;
        self
    }

    /// The same alarm moved to a new start time, keeping its identity.
    pub fn rescheduled(&self, start: NaiveDateTime) -> Self {
        Self {
            start: crate::clock::truncate_to_minute(start),
            ..self.clone()
        }
    }

    pub fn id(&self) -> AlarmId {
        self.id
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn is_light_alarm(&self) -> bool {
        self.is_light_alarm
    }

    pub fn light_alarm_duration(&self) -> Duration {
        self.light_alarm_duration
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    pub fn snooze_duration(&self) -> Duration {
        self.snooze_duration
    }

    /// The lead-in that counts for interference: zero when the light alarm is off.
    pub fn effective_light_duration(&self) -> Duration {
        effective_light_duration(self.is_light_alarm, self.light_alarm_duration)
    }

    /// Lazily expand this alarm's firing instants within `horizon`.
    pub fn occurrences(&self, horizon: &RecurrenceHorizon) -> Occurrences {
        Occurrences::new(self.start, self.repetition, horizon)
    }

    /// The first firing instant strictly after `now`, if one lies within `horizon`.
    pub fn next_occurrence_after(
        &self,
        now: NaiveDateTime,
        horizon: &RecurrenceHorizon,
    ) -> Option<NaiveDateTime> {
        self.occurrences(horizon).find(|occurrence| *occurrence > now)
    }
}

pub(crate) fn effective_light_duration(is_light_alarm: bool, duration: Duration) -> Duration {
    if is_light_alarm {
        duration.max(Duration::zero())
    } else {
        Duration::zero()
    }
}

fn non_negative(field: &'static str, duration: Duration) -> Result<Duration> {
    if duration < Duration::zero() {
        return Err(AlarmError::NegativeDuration {
            field,
            minutes: duration.num_minutes(),
        });
    }
    Ok(duration)
}

mod minute_precision {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        NaiveDateTime::deserialize(deserializer).map(crate::clock::truncate_to_minute)
    }
}
