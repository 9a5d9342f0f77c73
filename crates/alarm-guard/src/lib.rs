//! # alarm-guard
//!
//! Decides whether a proposed alarm would collide with alarms that are already
//! scheduled, once light-alarm lead-in, daily/weekly/monthly recurrence and a
//! mandatory safety buffer are taken into account.
//!
//! All computation is pure and synchronous over a snapshot of scheduled alarms.
//! Times are naive local date-times at minute precision.
//!
//! ## Modules
//!
//! - [`interval`] — half-open date-time ranges and the overlap predicate
//! - [`recurrence`] — lazy, horizon-bounded occurrence expansion
//! - [`zone`] — requested ranges and protected zones
//! - [`interference`] — the conflict scan over all scheduled alarms
//! - [`validity`] — the prioritized schedule/update state machine
//! - [`alarm`] — alarm records and identities
//! - [`config`] — safety buffer and recurrence horizon
//! - [`clock`] — wall-clock source
//! - [`error`] — Error types

pub mod alarm;
pub mod clock;
pub mod config;
pub mod error;
pub mod interference;
pub mod interval;
pub mod recurrence;
pub mod validity;
pub mod zone;

pub use alarm::{Alarm, AlarmId, Repetition};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{GuardConfig, RecurrenceHorizon};
pub use error::AlarmError;
pub use interference::{interferes, Conflict, InterferenceChecker};
pub use interval::Interval;
pub use validity::{AlarmState, Proposal};
