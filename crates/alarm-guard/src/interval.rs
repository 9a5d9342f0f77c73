//! Half-open date-time ranges.
//!
//! Every range in this crate is `[start, end)`. Requested ranges and protected
//! zones are both built in this representation (see [`crate::zone`]), so the
//! overlap test never needs an inclusive/exclusive correction.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A half-open range of naive local date-times, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Build a range from its inclusive start and exclusive end.
    ///
    /// An `end` earlier than `start` yields an empty range anchored at `start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `start <= point < end`.
    pub fn contains(&self, point: NaiveDateTime) -> bool {
        self.start <= point && point < self.end
    }

    /// True when the two ranges share at least one instant.
    ///
    /// Covers partial overlap on either side as well as nesting in either
    /// direction. Adjacent ranges (`self.end == other.start`) do not overlap,
    /// and an empty range overlaps nothing.
    pub fn overlaps_or_contains(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely inside `self`.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The same range moved by `delta`, pinned at the calendar's ends.
    pub fn shifted(&self, delta: Duration) -> Self {
        Self {
            start: saturating_add(self.start, delta),
            end: saturating_add(self.end, delta),
        }
    }
}

/// `at + delta`, clamped to `NaiveDateTime::MIN..=NaiveDateTime::MAX`.
pub(crate) fn saturating_add(at: NaiveDateTime, delta: Duration) -> NaiveDateTime {
    at.checked_add_signed(delta).unwrap_or(if delta < Duration::zero() {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

/// `at - delta`, clamped to `NaiveDateTime::MIN..=NaiveDateTime::MAX`.
pub(crate) fn saturating_sub(at: NaiveDateTime, delta: Duration) -> NaiveDateTime {
    at.checked_sub_signed(delta).unwrap_or(if delta < Duration::zero() {
        NaiveDateTime::MAX
    } else {
        NaiveDateTime::MIN
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn reversed_bounds_collapse_to_empty() {
        let range = Interval::new(at(6, 0), at(5, 0));
        assert!(range.is_empty());
        assert_eq!(range.start, at(6, 0));
        assert_eq!(range.duration(), Duration::zero());
    }

    #[test]
    fn shifted_preserves_length() {
        let range = Interval::new(at(5, 0), at(5, 30));
        let moved = range.shifted(Duration::hours(2));
        assert_eq!(moved, Interval::new(at(7, 0), at(7, 30)));
        assert_eq!(moved.duration(), range.duration());
    }

    #[test]
    fn arithmetic_saturates_at_calendar_ends() {
        let last = NaiveDate::MAX.and_hms_opt(23, 59, 0).unwrap();
        let first = NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap();

        assert_eq!(saturating_add(last, Duration::minutes(2)), NaiveDateTime::MAX);
        assert_eq!(saturating_sub(first, Duration::minutes(2)), NaiveDateTime::MIN);
        assert_eq!(saturating_add(first, Duration::minutes(-2)), NaiveDateTime::MIN);
        assert_eq!(saturating_sub(last, Duration::minutes(-2)), NaiveDateTime::MAX);
        assert_eq!(saturating_add(at(5, 0), Duration::minutes(30)), at(5, 30));

        let moved = Interval::new(at(5, 0), at(5, 30)).shifted(Duration::days(365 * 300_000));
        assert_eq!(moved, Interval::new(NaiveDateTime::MAX, NaiveDateTime::MAX));
    }
}
