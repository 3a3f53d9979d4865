//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use desk_core::responses::ErrorResponse;
use desk_db::DatabaseError;
use thiserror::Error;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The `:id` path segment is not an integer.
    #[error("Invalid ticket ID")]
    InvalidId,

    /// The body is not JSON of the expected shape.
    #[error("Invalid request body")]
    InvalidBody(String),

    /// The query string could not be decoded.
    #[error("Invalid query parameters")]
    InvalidQuery(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ApiError {
    /// Status code and client-facing message. Operational failures get a
    /// fixed message; their detail only goes to the log.
    fn parts(&self) -> (StatusCode, String) {
        match self {
            Self::InvalidId | Self::InvalidBody(_) | Self::InvalidQuery(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::Database(err) => match err {
                DatabaseError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                DatabaseError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "Ticket not found".to_string())
                }
                DatabaseError::Timeout => {
                    (StatusCode::GATEWAY_TIMEOUT, "Request timed out".to_string())
                }
                DatabaseError::Cancelled => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Request cancelled".to_string(),
                ),
                DatabaseError::Connection(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database unavailable".to_string(),
                ),
                DatabaseError::Persistence(_)
                | DatabaseError::Migration(_)
                | DatabaseError::InvalidState(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        match &self {
            Self::InvalidBody(detail) | Self::InvalidQuery(detail) => {
                tracing::debug!(%detail, "rejected request");
            }
            _ if status.is_server_error() => tracing::error!(error = %self, %status, "request failed"),
            _ => {}
        }
        (status, Json(ErrorResponse { error })).into_response()
    }
}
