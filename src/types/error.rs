//! Error types for the calendar service

use thiserror::Error;

/// Errors returned by every store, engine and lifecycle operation.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("no matching record")]
    NoMatch,

    #[error("record duplicate: {0}")]
    Duplicate(String),

    #[error("mandatory field '{field}' is not filled")]
    MissingField { field: &'static str },

    #[error("end of the event is ahead of the start")]
    InvalidRange,

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Deliberately does not say whether the username or the password was wrong.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("storage backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport and storage failures underneath a store.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("sql: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("password hashing: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("background task: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<sqlx::Error> for CalendarError {
    fn from(e: sqlx::Error) -> Self {
        CalendarError::Backend(BackendError::Sql(e))
    }
}

impl From<bcrypt::BcryptError> for CalendarError {
    fn from(e: bcrypt::BcryptError) -> Self {
        CalendarError::Backend(BackendError::Hash(e))
    }
}

impl CalendarError {
    /// True for errors caused by caller input rather than the backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalendarError::MissingField { .. }
                | CalendarError::InvalidRange
                | CalendarError::InvalidParams(_)
                | CalendarError::UnknownTimezone(_)
        )
    }
}
