//! Error types for birthdav.

use thiserror::Error;

/// Errors that can occur while synchronising birthdays.
#[derive(Error, Debug)]
pub enum BirthdavError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid birth date '{value}' on contact {uid}")]
    InvalidBirthDate { uid: String, value: String },

    #[error("{0} of {1} store operations failed")]
    Apply(usize, usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for birthdav operations.
pub type BirthdavResult<T> = Result<T, BirthdavError>;
