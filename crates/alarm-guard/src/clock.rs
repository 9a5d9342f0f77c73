//! Wall-clock source for the "is in the future" rule.
//!
//! All times are naive local date-times. Time-zone and DST changes are not
//! modeled: whatever the host reports as local time is taken as-is.

use chrono::{Duration, Local, NaiveDateTime, Timelike};

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt - Duration::seconds(i64::from(dt.second())) - Duration::nanoseconds(i64::from(dt.nanosecond()))
}
