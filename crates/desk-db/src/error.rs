//! Database error types for desk-db.

use desk_core::entities::TicketId;
use desk_core::errors::CoreError;
use thiserror::Error;

/// Errors from store and connection lifecycle operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Malformed payload or out-of-vocabulary value. Never reaches the store.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No row matches the given id.
    #[error("Ticket {id} not found")]
    NotFound { id: TicketId },

    /// The backing store could not be opened, reached or verified.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The caller's deadline expired before the operation completed.
    #[error("Operation timed out")]
    Timeout,

    /// The caller cancelled the operation before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// A statement failed for a reason not covered above, including
    /// constraint violations reported by libSQL.
    #[error("Query failed: {0}")]
    Persistence(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<CoreError> for DatabaseError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
        }
    }
}

impl From<libsql::Error> for DatabaseError {
    fn from(err: libsql::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
