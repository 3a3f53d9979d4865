//! Ticket status vocabulary and list ordering vocabulary.
//!
//! All enums use `snake_case` serialization and expose `as_str()` for the
//! value stored in (or interpolated into) SQL. Parsing from caller text goes
//! through `FromStr` and matches exactly (no trimming, no case folding),
//! failing with `CoreError::Validation`. Nothing is silently coerced except
//! `SortOrder`, whose contract is "anything but `asc` means `desc`".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

/// Status of a support ticket.
///
/// ```text
/// pending → accepted → resolved
///         → rejected
/// ```
///
/// Any status may be set from any other; the workflow above is the intended
/// path, not an enforced state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Pending,
    Accepted,
    Resolved,
    Rejected,
}

impl TicketStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Accepted, Self::Resolved, Self::Rejected];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::validation(format!(
                    "invalid status '{s}', expected one of: pending, accepted, resolved, rejected"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// StatusFilter
// ---------------------------------------------------------------------------

/// Status restriction for ticket listings.
///
/// An empty string or the sentinel `"all"` means no restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TicketStatus),
}

impl StatusFilter {
    /// The status to bind in a `WHERE status = ?` clause, if any.
    #[must_use]
    pub const fn status(self) -> Option<TicketStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

// ---------------------------------------------------------------------------
// SortField
// ---------------------------------------------------------------------------

/// Column a ticket listing can be ordered by.
///
/// This is the allow-list: the SQL identifier comes from `as_str()`, never
/// from caller text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Title,
    Description,
    ContactName,
    ContactEmail,
    ContactPhone,
    Status,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl SortField {
    pub const ALL: [Self; 9] = [
        Self::Id,
        Self::Title,
        Self::Description,
        Self::ContactName,
        Self::ContactEmail,
        Self::ContactPhone,
        Self::Status,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Column identifier in the `tickets` relation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::ContactName => "contact_name",
            Self::ContactEmail => "contact_email",
            Self::ContactPhone => "contact_phone",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::validation(format!("cannot sort by unknown field '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

/// Direction of a ticket listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Lenient parse: only the literal `asc` selects ascending order.
    #[must_use]
    pub fn coerce(s: &str) -> Self {
        if s == "asc" { Self::Asc } else { Self::Desc }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// SQL keyword for an `ORDER BY` clause.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(status_pending, TicketStatus, TicketStatus::Pending, "pending");
    test_serde_roundtrip!(status_rejected, TicketStatus, TicketStatus::Rejected, "rejected");
    test_serde_roundtrip!(sort_contact_email, SortField, SortField::ContactEmail, "contact_email");

    #[test]
    fn status_display_matches_serde() {
        for status in TicketStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(TicketStatus::default(), TicketStatus::Pending);
    }

    #[rstest]
    #[case("pending", TicketStatus::Pending)]
    #[case("accepted", TicketStatus::Accepted)]
    #[case("resolved", TicketStatus::Resolved)]
    #[case("rejected", TicketStatus::Rejected)]
    fn status_parses_known_values(#[case] input: &str, #[case] expected: TicketStatus) {
        assert_eq!(input.parse::<TicketStatus>().unwrap(), expected);
    }

    #[rstest]
    #[case("closed")]
    #[case("")]
    #[case("Pending")]
    #[case(" pending")]
    fn status_rejects_unknown_values(#[case] input: &str) {
        let err = input.parse::<TicketStatus>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[rstest]
    #[case("", StatusFilter::All)]
    #[case("all", StatusFilter::All)]
    #[case("accepted", StatusFilter::Only(TicketStatus::Accepted))]
    fn status_filter_parses(#[case] input: &str, #[case] expected: StatusFilter) {
        assert_eq!(input.parse::<StatusFilter>().unwrap(), expected);
    }

    #[rstest]
    #[case("closed")]
    #[case(" accepted")]
    #[case("ALL")]
    fn status_filter_rejects_unknown_status(#[case] input: &str) {
        assert!(matches!(
            input.parse::<StatusFilter>(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn sort_field_defaults_to_updated_at() {
        assert_eq!("".parse::<SortField>().unwrap(), SortField::UpdatedAt);
    }

    #[test]
    fn sort_field_accepts_every_column() {
        for field in SortField::ALL {
            assert_eq!(field.as_str().parse::<SortField>().unwrap(), field);
        }
    }

    #[rstest]
    #[case("created_at; DROP TABLE tickets")]
    #[case("CREATED_AT")]
    #[case("priority")]
    #[case(" title")]
    fn sort_field_rejects_anything_else(#[case] input: &str) {
        assert!(matches!(
            input.parse::<SortField>(),
            Err(CoreError::Validation(_))
        ));
    }

    #[rstest]
    #[case("asc", SortOrder::Asc)]
    #[case("desc", SortOrder::Desc)]
    #[case("", SortOrder::Desc)]
    #[case("xyz", SortOrder::Desc)]
    #[case("ASC", SortOrder::Desc)]
    fn sort_order_coerces_to_desc(#[case] input: &str, #[case] expected: SortOrder) {
        assert_eq!(SortOrder::coerce(input), expected);
    }
}
