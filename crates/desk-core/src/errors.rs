//! Cross-cutting error types for the helpdesk service.
//!
//! Storage failures (`DatabaseError`) and HTTP failures (`ApiError`) live in
//! their own crates. `CoreError` covers what can be decided from the payload
//! alone, before any statement reaches the backing store.

use thiserror::Error;

/// Errors raised while parsing or validating domain input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Data failed validation (unknown status, blank title, unknown sort field).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
