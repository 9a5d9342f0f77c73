//! Recurrence expansion: turns an alarm anchor into its concrete firing instants.
//!
//! Expansion is lazy and bounded by a [`RecurrenceHorizon`]. Each occurrence is
//! computed from the anchor rather than from the previous occurrence, so
//! month-end clamping does not accumulate (Jan 31 → Feb 29 → Mar 31).

use std::iter::FusedIterator;

use chrono::{Days, Months, NaiveDateTime};

use crate::alarm::Repetition;
use crate::config::RecurrenceHorizon;

/// Number of occurrences a repetition produces within `horizon`.
pub fn occurrence_count(repetition: Repetition, horizon: &RecurrenceHorizon) -> u32 {
    match repetition {
        Repetition::None => 1,
        Repetition::Daily => horizon.daily,
        Repetition::Weekly => horizon.weekly,
        Repetition::Monthly => horizon.monthly,
    }
}

/// The `k`-th occurrence after `anchor`, or `None` if it falls outside chrono's date range.
///
/// Monthly steps use calendar arithmetic: the day of month is clamped to the
/// last day of shorter months.
pub fn nth_occurrence(anchor: NaiveDateTime, repetition: Repetition, k: u32) -> Option<NaiveDateTime> {
    match repetition {
        Repetition::None => (k == 0).then_some(anchor),
        Repetition::Daily => anchor.checked_add_days(Days::new(u64::from(k))),
        Repetition::Weekly => anchor.checked_add_days(Days::new(u64::from(k) * 7)),
        Repetition::Monthly => anchor.checked_add_months(Months::new(k)),
    }
}

/// Lazy, finite iterator over an alarm's occurrences.
///
/// A clone continues from the same position. Build a
/// fresh iterator with [`Occurrences::new`] to start over from the anchor.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDateTime,
    repetition: Repetition,
    next: u32,
    count: u32,
}

impl Occurrences {
    pub fn new(anchor: NaiveDateTime, repetition: Repetition, horizon: &RecurrenceHorizon) -> Self {
        Self {
            anchor,
            repetition,
            next: 0,
            count: occurrence_count(repetition, horizon),
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        match nth_occurrence(self.anchor, self.repetition, self.next) {
            Some(occurrence) => {
                self.next += 1;
                Some(occurrence)
            }
            None => {
                // Past the end of the representable calendar; nothing later exists either.
                self.next = self.count;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.next) as usize;
        // Overflow near the calendar's end can cut the sequence short.
        (0, Some(remaining))
    }
}

impl FusedIterator for Occurrences {}
