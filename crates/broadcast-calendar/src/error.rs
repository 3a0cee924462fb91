//! Error types for broadcast-calendar operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid quarter: {0}")]
    InvalidQuarter(String),

    #[error("Invalid cutover: {0}")]
    InvalidCutover(String),

    #[error("Invalid week record: {0}")]
    InvalidRecord(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
