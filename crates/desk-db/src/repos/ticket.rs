//! Ticket repository: create, fetch, list, full replace and status transitions.
//!
//! Each operation is a single statement. Writes use `RETURNING` so the
//! caller gets the row exactly as stored, and `updated_at` only ever moves
//! forward (`MAX(updated_at, ?)`), even if the clock steps back.

use desk_core::entities::{NewTicket, Ticket, TicketId};
use desk_core::enums::TicketStatus;

use crate::context::OpContext;
use crate::error::DatabaseError;
use crate::executor::Executor;
use crate::helpers::{fetch_optional, now_text, parse_datetime};
use crate::query::TicketQuery;
use crate::service::TicketStore;

pub(crate) const SELECT_COLS: &str = "id, title, description, contact_name, contact_email, \
     contact_phone, status, created_at, updated_at";

fn row_to_ticket(row: &libsql::Row) -> Result<Ticket, DatabaseError> {
    let status = row.get::<String>(6)?;
    Ok(Ticket {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        contact_name: row.get(3)?,
        contact_email: row.get(4)?,
        contact_phone: row.get(5)?,
        status: status
            .parse::<TicketStatus>()
            .map_err(|_| DatabaseError::InvalidState(format!("unknown status '{status}' in row")))?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl<E: Executor> TicketStore<E> {
    /// Persist a new ticket. A missing status becomes `pending`.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank title or unknown status, `Timeout`/`Cancelled`
    /// when `ctx` ends first, a persistence error if the insert fails.
    pub async fn create_ticket(
        &self,
        ctx: &OpContext,
        ticket: NewTicket,
    ) -> Result<Ticket, DatabaseError> {
        let fields = ticket.into_fields()?;
        ctx.run(async {
            let now = now_text();
            let conn = self.executor().acquire().await?;
            let rows = conn
                .query(
                    &format!(
                        "INSERT INTO tickets (title, description, contact_name, contact_email, contact_phone, status, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                         RETURNING {SELECT_COLS}"
                    ),
                    libsql::params![
                        fields.title.as_str(),
                        fields.description.as_str(),
                        fields.contact_name.as_str(),
                        fields.contact_email.as_str(),
                        fields.contact_phone.as_str(),
                        fields.status.as_str(),
                        now.as_str()
                    ],
                )
                .await?;
            fetch_optional(rows, row_to_ticket)
                .await?
                .ok_or_else(|| DatabaseError::Persistence("insert returned no row".into()))
        })
        .await
    }

    /// # Errors
    ///
    /// `NotFound` when no row has this id.
    pub async fn get_ticket_by_id(
        &self,
        ctx: &OpContext,
        id: TicketId,
    ) -> Result<Ticket, DatabaseError> {
        ctx.run(async {
            let conn = self.executor().acquire().await?;
            let rows = conn
                .query(
                    &format!("SELECT {SELECT_COLS} FROM tickets WHERE id = ?1"),
                    [id],
                )
                .await?;
            fetch_optional(rows, row_to_ticket)
                .await?
                .ok_or(DatabaseError::NotFound { id })
        })
        .await
    }

    /// List tickets from raw listing parameters.
    ///
    /// `status` is empty or `all` for every ticket, otherwise one of the four
    /// statuses. `sort` is empty for `updated_at`, otherwise a ticket column.
    /// `order` is `asc` for ascending; any other value sorts descending.
    ///
    /// # Errors
    ///
    /// `Validation` for an unknown status filter or sort column.
    pub async fn get_tickets(
        &self,
        ctx: &OpContext,
        status: &str,
        sort: &str,
        order: &str,
    ) -> Result<Vec<Ticket>, DatabaseError> {
        let query = TicketQuery::parse(status, sort, order)?;
        self.query_tickets(ctx, &query).await
    }

    /// List tickets matching an already-validated query.
    ///
    /// # Errors
    ///
    /// `Timeout`/`Cancelled` when `ctx` ends first, a persistence error if
    /// the query fails.
    pub async fn query_tickets(
        &self,
        ctx: &OpContext,
        query: &TicketQuery,
    ) -> Result<Vec<Ticket>, DatabaseError> {
        let (sql, params) = query.to_sql();
        ctx.run(async {
            let conn = self.executor().acquire().await?;
            let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;

            let mut tickets = Vec::new();
            while let Some(row) = rows.next().await? {
                tickets.push(row_to_ticket(&row)?);
            }
            Ok::<_, DatabaseError>(tickets)
        })
        .await
    }

    /// Replace every client-writable field of a ticket. Omitted fields take
    /// their defaults: empty text and `pending` status.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad payload, `NotFound` when no row has this id.
    pub async fn update_ticket(
        &self,
        ctx: &OpContext,
        id: TicketId,
        ticket: NewTicket,
    ) -> Result<Ticket, DatabaseError> {
        let fields = ticket.into_fields()?;
        ctx.run(async {
            let now = now_text();
            let conn = self.executor().acquire().await?;
            let rows = conn
                .query(
                    &format!(
                        "UPDATE tickets
                         SET title = ?1, description = ?2, contact_name = ?3, contact_email = ?4,
                             contact_phone = ?5, status = ?6, updated_at = MAX(updated_at, ?7)
                         WHERE id = ?8
                         RETURNING {SELECT_COLS}"
                    ),
                    libsql::params![
                        fields.title.as_str(),
                        fields.description.as_str(),
                        fields.contact_name.as_str(),
                        fields.contact_email.as_str(),
                        fields.contact_phone.as_str(),
                        fields.status.as_str(),
                        now.as_str(),
                        id
                    ],
                )
                .await?;
            fetch_optional(rows, row_to_ticket)
                .await?
                .ok_or(DatabaseError::NotFound { id })
        })
        .await
    }

    /// Move a ticket to `status`, touching nothing but `status` and
    /// `updated_at`. Any status may follow any other.
    ///
    /// The status is checked before a connection is taken, so an unknown
    /// value never reaches the store.
    ///
    /// # Errors
    ///
    /// `Validation` for a status outside the vocabulary, `NotFound` when no
    /// row has this id.
    pub async fn update_ticket_status(
        &self,
        ctx: &OpContext,
        id: TicketId,
        status: &str,
    ) -> Result<Ticket, DatabaseError> {
        let status = status.parse::<TicketStatus>()?;
        ctx.run(async {
            let now = now_text();
            let conn = self.executor().acquire().await?;
            let rows = conn
                .query(
                    &format!(
                        "UPDATE tickets SET status = ?1, updated_at = MAX(updated_at, ?2)
                         WHERE id = ?3
                         RETURNING {SELECT_COLS}"
                    ),
                    libsql::params![status.as_str(), now.as_str(), id],
                )
                .await?;
            fetch_optional(rows, row_to_ticket)
                .await?
                .ok_or(DatabaseError::NotFound { id })
        })
        .await
    }
}
