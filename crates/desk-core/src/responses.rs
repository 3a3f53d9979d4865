//! Response envelopes returned as JSON by the HTTP layer.

use serde::{Deserialize, Serialize};

use crate::entities::Ticket;

/// Response from `GET /api/v1/tickets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketListResponse {
    pub tickets: Vec<Ticket>,
}

/// Request body of `PUT /api/v1/tickets/:id/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatusChangeRequest {
    pub status: String,
}

/// Response from `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
