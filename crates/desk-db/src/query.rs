//! Ticket listing query builder.
//!
//! The only dynamic parts of the statement are the `ORDER BY` column and
//! direction, and both come from closed enums. The status filter is always a
//! bound parameter.

use desk_core::enums::{SortField, SortOrder, StatusFilter};
use desk_core::errors::CoreError;

use crate::repos::ticket::SELECT_COLS;

/// A validated ticket listing request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketQuery {
    pub status: StatusFilter,
    pub sort: SortField,
    pub order: SortOrder,
}

impl TicketQuery {
    /// Parse the raw listing parameters.
    ///
    /// `status` may be empty or `all` for no filter. `sort` may be empty for
    /// the default column. `order` never fails: anything but `asc` is `desc`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a status outside the vocabulary or
    /// a sort column outside the allow-list.
    pub fn parse(status: &str, sort: &str, order: &str) -> Result<Self, CoreError> {
        Ok(Self {
            status: status.parse()?,
            sort: sort.parse()?,
            order: SortOrder::coerce(order),
        })
    }

    /// Build the statement and its parameters.
    ///
    /// Rows tied on the sort column are ordered by `id` in the same direction
    /// so listings are deterministic.
    #[must_use]
    pub fn to_sql(&self) -> (String, Vec<libsql::Value>) {
        let mut sql = format!("SELECT {SELECT_COLS} FROM tickets");
        let mut params = Vec::new();

        if let Some(status) = self.status.status() {
            sql.push_str(" WHERE status = ?1");
            params.push(libsql::Value::Text(status.as_str().to_string()));
        }

        let dir = self.order.as_sql();
        sql.push_str(&format!(" ORDER BY {} {dir}", self.sort.as_str()));
        if self.sort != SortField::Id {
            sql.push_str(&format!(", id {dir}"));
        }
        (sql, params)
    }
}
