//! Row parsing and timestamp helpers.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text with microsecond
//! precision, so `ORDER BY created_at` on the TEXT column is chronological.
//! Rows written by hand (e.g. through the sqlite shell with
//! `datetime('now')`) are still readable.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::DatabaseError;

/// Format a timestamp for storage: `2026-02-09T14:30:00.123456Z`.
#[must_use]
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The current time in storage format.
#[must_use]
pub fn now_text() -> String {
    format_datetime(Utc::now())
}

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00Z"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the string matches neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::InvalidState(format!("Failed to parse datetime '{s}': {e}")))
}

/// Map the first row of a result set with `map`, then step past any rest.
///
/// A local `libsql::Row` reads from the live statement, so it must be
/// mapped before the result set advances.
///
/// # Errors
///
/// Returns `DatabaseError` if stepping the result set or `map` fails.
pub async fn fetch_optional<T>(
    mut rows: libsql::Rows,
    map: impl FnOnce(&libsql::Row) -> Result<T, DatabaseError>,
) -> Result<Option<T>, DatabaseError> {
    let first = match rows.next().await? {
        Some(row) => Some(map(&row)?),
        None => None,
    };
    while rows.next().await?.is_some() {}
    Ok(first)
}
