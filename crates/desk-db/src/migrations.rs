//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them when a
//! pool is opened. All statements use `IF NOT EXISTS` for idempotent re-running.

use std::sync::Arc;

use crate::error::DatabaseError;
use crate::pool::ConnectionPool;

/// `tickets` relation, its indexes and the identity guard trigger.
const MIGRATION_001: &str = include_str!("../migrations/001_tickets.sql");

/// Run all embedded migrations in sequence on one pooled connection.
pub(crate) async fn run(pool: &Arc<ConnectionPool>) -> Result<(), DatabaseError> {
    let conn = pool.acquire().await?;
    conn.execute_batch(MIGRATION_001)
        .await
        .map_err(|e| DatabaseError::Migration(format!("001_tickets: {e}")))?;
    Ok(())
}
