use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::TicketStatus;
use crate::errors::CoreError;

/// Store-assigned ticket identifier.
pub type TicketId = i64;

/// A persisted support request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create and full-replace payload.
///
/// Every field is optional on the wire. Omitted text fields become empty
/// strings, an omitted status becomes `pending`. `status` stays raw text here
/// so that an unknown value is reported as a validation failure by
/// [`NewTicket::validate`] instead of a decoding failure. Server-managed
/// fields (`id`, `created_at`, `updated_at`) are ignored if present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Validated content of a ticket: everything a write statement binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFields {
    pub title: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub status: TicketStatus,
}

impl NewTicket {
    /// Payload with a title and every other field left to its default.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Fill the status default. A missing or blank status becomes `pending`.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        if self.status.as_deref().is_none_or(|s| s.trim().is_empty()) {
            self.status = Some(TicketStatus::default().as_str().to_string());
        }
        self
    }

    /// Check the payload and produce the fields to persist.
    ///
    /// Call [`with_defaults`](Self::with_defaults) first; a payload without a
    /// status is rejected here.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank title, a missing status,
    /// or a status outside the four-value vocabulary.
    pub fn validate(self) -> Result<TicketFields, CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation("title is required"));
        }
        let status = self
            .status
            .as_deref()
            .ok_or_else(|| CoreError::validation("status is required"))?
            .parse::<TicketStatus>()?;

        Ok(TicketFields {
            title: self.title,
            description: self.description,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            status,
        })
    }

    /// Default-fill then validate.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn into_fields(self) -> Result<TicketFields, CoreError> {
        self.with_defaults().validate()
    }
}
