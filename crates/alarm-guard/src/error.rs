//! Error types for alarm-guard construction and configuration.
//!
//! The interference checker and the validity state machine are total: they
//! never fail and report problems through `bool` / [`AlarmState`]. Errors only
//! arise where values enter the crate.
//!
//! [`AlarmState`]: crate::validity::AlarmState

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("{field} must not be negative (got {minutes} minutes)")]
    NegativeDuration { field: &'static str, minutes: i64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlarmError>;
