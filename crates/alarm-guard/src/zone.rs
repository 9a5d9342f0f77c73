//! Requested ranges and protected zones.
//!
//! Both are half-open minute ranges:
//!
//! - A proposed alarm *requests* its light-alarm lead-in plus its firing
//!   minute: `[start - light, start + 1min)`.
//! - A scheduled occurrence *protects* its lead-in widened by the safety
//!   buffer on both sides, leaving the buffer's boundary minutes free:
//!   `[o - light - buffer + 1min, o + buffer)`.
//!
//! With this pairing a non-light alarm exactly `buffer` after another is
//! allowed, and one minute closer is not.

use chrono::{Duration, NaiveDateTime};

use crate::interval::{saturating_add, saturating_sub, Interval};

fn one_minute() -> Duration {
    Duration::minutes(1)
}

/// The range a proposed alarm at `start` with the given lead-in occupies.
///
/// Bounds that would leave chrono's calendar are pinned to its ends.
pub fn requested_range(start: NaiveDateTime, effective_light: Duration) -> Interval {
    Interval::new(
        saturating_sub(start, effective_light),
        saturating_add(start, one_minute()),
    )
}

/// The range around one scheduled occurrence that no requested range may touch.
pub fn protected_zone(
    occurrence: NaiveDateTime,
    effective_light: Duration,
    buffer: Duration,
) -> Interval {
    let start = effective_light
        .checked_add(&buffer)
        .and_then(|lead_in| lead_in.checked_sub(&one_minute()))
        .map_or(NaiveDateTime::MIN, |lead_in| saturating_sub(occurrence, lead_in));
    Interval::new(start, saturating_add(occurrence, buffer))
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
    fn zone_spans_lead_in_and_buffer() {
        let zone = protected_zone(at(5, 0), Duration::minutes(30), Duration::minutes(2));
        assert_eq!(zone, Interval::new(at(4, 29), at(5, 2)));
        assert!(zone.contains(at(5, 1)));
        assert!(!zone.contains(at(5, 2)));
        assert!(!zone.contains(at(4, 28)));
    }

    #[test]
    fn requested_range_includes_firing_minute() {
        let range = requested_range(at(6, 0), Duration::zero());
        assert!(!range.is_empty());
        assert!(range.contains(at(6, 0)));
        assert_eq!(range.duration(), Duration::minutes(1));
    }

    #[test]
    fn ranges_are_pinned_to_the_calendar() {
        let first = NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap();
        let last = NaiveDate::MAX.and_hms_opt(23, 59, 0).unwrap();
        let light = Duration::minutes(30);
        let buffer = Duration::minutes(2);

        assert_eq!(protected_zone(first, light, buffer), Interval::new(NaiveDateTime::MIN, first + buffer));
        assert_eq!(protected_zone(last, light, buffer).end, NaiveDateTime::MAX);
        assert_eq!(requested_range(first, light).start, NaiveDateTime::MIN);
        assert_eq!(requested_range(last, light).end, NaiveDateTime::MAX);
    }
}
