//! Error types for zone-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Could not parse anchor: {0}")]
    AnchorParse(String),

    #[error("Nonexistent local time: {0}")]
    NonexistentLocalTime(String),

    #[error("Ambiguous local time: {0}")]
    AmbiguousLocalTime(String),
}

pub type Result<T> = std::result::Result<T, ZoneError>;
