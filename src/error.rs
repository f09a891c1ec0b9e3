//! Error types of this crate

use thiserror::Error;

use crate::meeting::MeetingId;

/// Everything that can go wrong while managing meetings.
///
/// None of these are fatal: storage errors degrade the session, validation and lookup errors
/// leave the state untouched and are reported to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// The key-value store cannot be read or written
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The stored value is not a valid meeting list
    #[error("stored meetings are corrupt: {0}")]
    StorageCorrupt(#[from] serde_json::Error),

    #[error("invalid meeting: {0}")]
    ValidationFailure(#[from] ValidationFailure),

    #[error("no meeting with id {0}")]
    NotFound(MeetingId),

    #[error("unable to render the dashboard: {0}")]
    Render(#[from] askama::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

/// Why a submitted form was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("the meeting name is required")]
    MissingName,
    #[error("the meeting time is required")]
    MissingTime,
    #[error("the meeting time {0:?} is not a valid date and time")]
    MalformedTime(String),
    #[error("the meeting link is required")]
    MissingLink,
}

pub type Result<T> = std::result::Result<T, Error>;
