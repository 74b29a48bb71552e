//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid duration: {0} minutes (must be between 1 and 1440)")]
    InvalidDuration(u32),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown site: {0}")]
    UnknownSite(String),

    /// A collaborator (data-access layer) failed to produce schedule data.
    #[error("Schedule source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
