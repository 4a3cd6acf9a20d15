//! Error types for the scheduling library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all scheduling operations.
///
/// Note that a check-in against an already-completed reminder is *not* an
/// error: it is reported as
/// [`CheckInOutcome::AlreadyCompleted`](crate::models::CheckInOutcome) so
/// callers can surface it as a normal, non-exceptional status.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Action plan not found for the given ID
    #[error("Action plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// Reminder not found for the given ID
    #[error("Reminder with ID {id} not found")]
    ReminderNotFound { id: u64 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Corrupt or contradictory persisted state (duplicate sequence numbers,
    /// unparseable timestamps). Aborts the enclosing operation; never
    /// silently patched.
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },
    /// The timer/job backend refused to arm a notification. Logged and
    /// recovered by the sweeper; never fatal to the surrounding transaction.
    #[error("Scheduling backend unavailable: {message}")]
    SchedulingUnavailable { message: String },
    /// The notification transport failed to deliver. Caught inside the
    /// dispatcher; the hourly re-arm makes delivery at-least-once.
    #[error("Notification transport failure: {message}")]
    TransportFailure { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ScheduleError {
    /// Creates a new database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ScheduleError::database_error(message, e))
    }
}

/// Result type alias for scheduling operations
pub type Result<T> = std::result::Result<T, ScheduleError>;
