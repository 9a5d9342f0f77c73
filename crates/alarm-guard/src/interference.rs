//! Detect whether a proposed alarm interferes with already scheduled alarms.
//!
//! Every scheduled alarm is expanded over the recurrence horizon and each
//! occurrence is turned into a protected zone. A proposal interferes when its
//! requested range overlaps any of those zones. The alarm being edited, named
//! by its [`AlarmId`], is skipped so it never conflicts with its own prior
//! schedule.

use chrono::{Duration, NaiveDateTime};

use crate::alarm::{Alarm, AlarmId};
use crate::config::GuardConfig;
use crate::interval::Interval;
use crate::zone::{protected_zone, requested_range};

/// A scheduled occurrence that blocks a proposed alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub alarm_id: AlarmId,
    pub occurrence: NaiveDateTime,
    pub protected_zone: Interval,
    pub requested: Interval,
}

/// Pure conflict checker over a snapshot of scheduled alarms.
///
/// Holds nothing but its configuration, so a single instance can be shared
/// freely and called on every form change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterferenceChecker {
    config: GuardConfig,
}

impl InterferenceChecker {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// True when a proposed alarm at `start` with `light_duration` lead-in
    /// overlaps the protected zone of any occurrence of any scheduled alarm
    /// other than `exclude`.
    ///
    /// Stops at the first conflict found.
    pub fn interferes(
        &self,
        start: NaiveDateTime,
        light_duration: Duration,
        scheduled: &[Alarm],
        exclude: Option<&AlarmId>,
    ) -> bool {
        self.first_conflict(start, light_duration, scheduled, exclude)
            .is_some()
    }

    /// The first blocking occurrence, scanning alarms in order and each
    /// alarm's occurrences chronologically.
    pub fn first_conflict(
        &self,
        start: NaiveDateTime,
        light_duration: Duration,
        scheduled: &[Alarm],
        exclude: Option<&AlarmId>,
    ) -> Option<Conflict> {
        let requested = requested_range(start, light_duration.max(Duration::zero()));
        let conflict = candidates(scheduled, exclude)
            .find_map(|alarm| self.conflict_with(alarm, &requested));

        if let Some(c) = &conflict {
            tracing::debug!(
                alarm = %c.alarm_id,
                occurrence = %c.occurrence,
                zone_start = %c.protected_zone.start,
                zone_end = %c.protected_zone.end,
                "proposed alarm interferes with scheduled occurrence"
            );
        }
        conflict
    }

    /// Every scheduled alarm that blocks the proposal, each reported once
    /// with its earliest blocking occurrence.
    pub fn conflicts(
        &self,
        start: NaiveDateTime,
        light_duration: Duration,
        scheduled: &[Alarm],
        exclude: Option<&AlarmId>,
    ) -> Vec<Conflict> {
        let requested = requested_range(start, light_duration.max(Duration::zero()));
        candidates(scheduled, exclude)
            .filter_map(|alarm| self.conflict_with(alarm, &requested))
            .collect()
    }

    fn conflict_with(&self, alarm: &Alarm, requested: &Interval) -> Option<Conflict> {
        let light = alarm.effective_light_duration();
        let buffer = self.config.alarm_start_buffer;

        alarm
            .occurrences(&self.config.horizon)
            .find_map(|occurrence| {
                let zone = protected_zone(occurrence, light, buffer);
                zone.overlaps_or_contains(requested).then(|| Conflict {
                    alarm_id: alarm.id(),
                    occurrence,
                    protected_zone: zone,
                    requested: *requested,
                })
            })
    }
}

fn candidates<'a>(
    scheduled: &'a [Alarm],
    exclude: Option<&'a AlarmId>,
) -> impl Iterator<Item = &'a Alarm> + 'a {
    scheduled.iter().filter(move |alarm| {
        let skip = exclude.is_some_and(|id| *id == alarm.id());
        if skip {
            tracing::trace!(alarm = %alarm.id(), "skipping alarm being edited");
        }
        !skip
    })
}

/// Convenience wrapper for callers that do not keep an [`InterferenceChecker`].
pub fn interferes(
    config: &GuardConfig,
    start: NaiveDateTime,
    light_duration: Duration,
    scheduled: &[Alarm],
    exclude: Option<&AlarmId>,
) -> bool {
    InterferenceChecker::new(*config).interferes(start, light_duration, scheduled, exclude)
}
