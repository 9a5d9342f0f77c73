//! Classify an attempted schedule/update action into a single user-facing state.
//!
//! Checks run in a fixed priority order and the first failing one wins: a
//! missing field hides duration errors, an invalid duration hides the
//! future-time and overlap checks, and so on.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::alarm::{effective_light_duration, Alarm, AlarmId};
use crate::clock::{truncate_to_minute, Clock};
use crate::interference::InterferenceChecker;
use crate::interval::{saturating_add, saturating_sub};

/// Outcome of validating a proposed alarm, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmState {
    DateAndTimeNotSet,
    DateNotSet,
    TimeNotSet,
    InvalidLightAlarmDuration,
    InvalidSnoozeDuration,
    TimeIsNotInFuture,
    AlarmOverlapsExistingAlarm,
    NoError,
}

impl AlarmState {
    /// Whether the schedule/update action may be committed.
    pub fn is_ready(&self) -> bool {
        *self == AlarmState::NoError
    }

    /// Stable machine-readable name.
    pub fn code(&self) -> &'static str {
        match self {
            AlarmState::DateAndTimeNotSet => "DATE_AND_TIME_NOT_SET",
            AlarmState::DateNotSet => "DATE_NOT_SET",
            AlarmState::TimeNotSet => "TIME_NOT_SET",
            AlarmState::InvalidLightAlarmDuration => "INVALID_LIGHT_ALARM_DURATION",
            AlarmState::InvalidSnoozeDuration => "INVALID_SNOOZE_DURATION",
            AlarmState::TimeIsNotInFuture => "TIME_IS_NOT_IN_FUTURE",
            AlarmState::AlarmOverlapsExistingAlarm => "ALARM_OVERLAPS_EXISTING_ALARM",
            AlarmState::NoError => "NO_ERROR",
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            AlarmState::DateAndTimeNotSet => "Select a date and time",
            AlarmState::DateNotSet => "Select a date",
            AlarmState::TimeNotSet => "Select a time",
            AlarmState::InvalidLightAlarmDuration => "Light alarm duration is out of range",
            AlarmState::InvalidSnoozeDuration => "Snooze duration is out of range",
            AlarmState::TimeIsNotInFuture => "The alarm must start in the future",
            AlarmState::AlarmOverlapsExistingAlarm => "The alarm overlaps an existing alarm",
            AlarmState::NoError => "Ready to schedule",
        };
        f.write_str(message)
    }
}

/// The inputs of a schedule/edit form.
///
/// The `*_valid` flags come from the numeric input fields' own bounds checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub is_light_alarm: bool,
    pub light_alarm_duration: Duration,
    pub light_duration_valid: bool,
    pub snooze_duration_valid: bool,
    /// The alarm being edited, if any.
    pub replacing: Option<AlarmId>,
}

impl Default for Proposal {
    fn default() -> Self {
        Self {
            date: None,
            time: None,
            is_light_alarm: false,
            light_alarm_duration: Duration::zero(),
            light_duration_valid: true,
            snooze_duration_valid: true,
            replacing: None,
        }
    }
}

impl Proposal {
    /// A new-alarm proposal at `start`.
    pub fn at(start: NaiveDateTime) -> Self {
        Self {
            date: Some(start.date()),
            time: Some(start.time()),
            ..Self::default()
        }
    }

    /// A form pre-filled from an existing alarm, replacing it on commit.
    pub fn editing(alarm: &Alarm) -> Self {
        Self {
            is_light_alarm: alarm.is_light_alarm(),
            light_alarm_duration: alarm.light_alarm_duration(),
            replacing: Some(alarm.id()),
            ..Self::at(alarm.start())
        }
    }

    pub fn with_light_alarm(mut self, duration: Duration) -> Self {
        self.is_light_alarm = true;
        self.light_alarm_duration = duration;
        self
    }

    /// Combined date and time at minute precision, when both are set.
    pub fn start(&self) -> Option<NaiveDateTime> {
        let date = self.date?;
        let time = self.time?;
        Some(truncate_to_minute(date.and_time(time)))
    }

    pub fn effective_light_duration(&self) -> Duration {
        effective_light_duration(self.is_light_alarm, self.light_alarm_duration)
    }
}

impl InterferenceChecker {
    /// Run every check in priority order and report the first failure.
    pub fn evaluate_state(
        &self,
        proposal: &Proposal,
        scheduled: &[Alarm],
        now: NaiveDateTime,
    ) -> AlarmState {
        let state = self.classify(proposal, scheduled, now);
        tracing::trace!(state = state.code(), "evaluated alarm proposal");
        state
    }

    /// [`evaluate_state`](Self::evaluate_state) reading "now" from `clock`.
    pub fn evaluate_state_with_clock(
        &self,
        proposal: &Proposal,
        scheduled: &[Alarm],
        clock: &impl Clock,
    ) -> AlarmState {
        self.evaluate_state(proposal, scheduled, clock.now())
    }

    fn classify(&self, proposal: &Proposal, scheduled: &[Alarm], now: NaiveDateTime) -> AlarmState {
        let start = match (proposal.date, proposal.time) {
            (None, None) => return AlarmState::DateAndTimeNotSet,
            (None, Some(_)) => return AlarmState::DateNotSet,
            (Some(_), None) => return AlarmState::TimeNotSet,
            (Some(date), Some(time)) => truncate_to_minute(date.and_time(time)),
        };

        if !proposal.light_duration_valid || proposal.light_alarm_duration < Duration::zero() {
            return AlarmState::InvalidLightAlarmDuration;
        }
        if !proposal.snooze_duration_valid {
            return AlarmState::InvalidSnoozeDuration;
        }

        let light = proposal.effective_light_duration();
        if !self.is_in_future(start, light, now) {
            return AlarmState::TimeIsNotInFuture;
        }
        if self.interferes(start, light, scheduled, proposal.replacing.as_ref()) {
            return AlarmState::AlarmOverlapsExistingAlarm;
        }
        AlarmState::NoError
    }

    /// Whether an alarm at `start` leaves room for its lead-in and buffer
    /// after the current minute.
    pub fn is_in_future(
        &self,
        start: NaiveDateTime,
        effective_light: Duration,
        now: NaiveDateTime,
    ) -> bool {
        let latest_lead_in = saturating_sub(
            saturating_sub(start, self.config().alarm_start_buffer),
            effective_light,
        );
        truncate_to_minute(now) < latest_lead_in
    }

    /// The earliest start that passes [`is_in_future`](Self::is_in_future), for hint display.
    ///
    /// Pinned to `NaiveDateTime::MAX` when no later start is representable.
    pub fn earliest_possible_alarm_time(
        &self,
        light_duration: Duration,
        now: NaiveDateTime,
    ) -> NaiveDateTime {
        [
            Duration::minutes(1),
            self.config().alarm_start_buffer,
            light_duration.max(Duration::zero()),
        ]
        .into_iter()
        .fold(truncate_to_minute(now), saturating_add)
    }
}
