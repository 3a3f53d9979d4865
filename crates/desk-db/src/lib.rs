//! # desk-db
//!
//! libSQL persistence for the helpdesk service.
//!
//! Two layers live here:
//! - [`DeskDb`] owns the connection pool: connect, reconnect, ping, close.
//!   It is the process-wide [`Executor`] the store draws connections from.
//! - [`TicketStore`] is the sole mediator between ticket operations and the
//!   `tickets` relation. Every operation is one SQL statement bounded by an
//!   [`OpContext`].
//!
//! The backing store is a local libSQL file or a remote libSQL server,
//! depending on [`DatabaseConfig`](desk_config::DatabaseConfig).

pub mod context;
pub mod error;
pub mod executor;
pub mod helpers;
mod migrations;
pub mod pool;
pub mod query;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use desk_config::{DatabaseConfig, PoolConfig};

pub use context::OpContext;
pub use error::DatabaseError;
pub use executor::Executor;
pub use pool::{ConnectionPool, PooledConnection};
pub use query::TicketQuery;
pub use service::TicketStore;

/// Process-wide database handle with a replace-on-reconnect lifecycle.
///
/// The live pool sits behind a lock and is only ever handed out as an `Arc`
/// snapshot. A reconnect swaps the reference in one step, so an operation
/// holds either the old pool or the new one, never a mix.
pub struct DeskDb {
    source: DatabaseConfig,
    pool_config: PoolConfig,
    current: RwLock<Arc<ConnectionPool>>,
    closed: AtomicBool,
}

impl std::fmt::Debug for DeskDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskDb")
            .field("local", &self.source.is_local())
            .field("name", &self.source.name)
            .field("pool", &self.pool())
            .finish_non_exhaustive()
    }
}

impl DeskDb {
    /// Open a pool for `source`, verify it, and bring the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connection` if the store cannot be opened or
    /// does not answer a ping within `connect_timeout`, and
    /// `DatabaseError::Migration` if the schema cannot be applied.
    pub async fn connect(
        source: DatabaseConfig,
        pool_config: PoolConfig,
    ) -> Result<Self, DatabaseError> {
        let pool = open_verified(&source, &pool_config).await?;
        tracing::info!(
            local = source.is_local(),
            name = %source.name,
            max_open = pool_config.max_open_connections,
            max_idle = pool_config.max_idle_connections,
            "database connected"
        );
        Ok(Self {
            source,
            pool_config,
            current: RwLock::new(pool),
            closed: AtomicBool::new(false),
        })
    }

    /// Connect to a local database file with default pool bounds.
    ///
    /// # Errors
    ///
    /// See [`connect`](Self::connect).
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::connect(DatabaseConfig::local(path), PoolConfig::default()).await
    }

    /// Build a fresh pool from the stored data source and swap it in.
    ///
    /// The old pool is closed only after the new one has answered a ping.
    /// If anything fails before that, the current pool stays in place and
    /// keeps serving.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connection` if the handle has been closed or
    /// the new pool cannot be verified.
    pub async fn reconnect(&self) -> Result<(), DatabaseError> {
        if self.is_closed() {
            return Err(handle_closed());
        }
        let fresh = open_verified(&self.source, &self.pool_config).await?;

        let old = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            if self.is_closed() {
                drop(current);
                fresh.close();
                return Err(handle_closed());
            }
            std::mem::replace(&mut *current, fresh)
        };
        old.close();
        tracing::info!(name = %self.source.name, "database reconnected");
        Ok(())
    }

    /// Liveness probe on the current pool, bounded by the connect timeout.
    /// Never reconnects.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connection` if the probe fails or times out.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let pool = self.pool();
        let timeout = self.pool_config.connect_timeout();
        tokio::time::timeout(timeout, pool.ping())
            .await
            .map_err(|_| DatabaseError::Connection(format!("ping timed out after {timeout:?}")))?
    }

    /// Release every pooled connection. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .close();
        tracing::debug!(name = %self.source.name, "database closed");
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Snapshot of the live pool.
    #[must_use]
    pub fn pool(&self) -> Arc<ConnectionPool> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Executor for DeskDb {
    async fn acquire(&self) -> Result<PooledConnection, DatabaseError> {
        let pool = self.pool();
        pool.acquire().await
    }
}

/// Open a pool, ping it within the connect timeout, then apply migrations.
/// A pool that fails any step is closed before the error is returned.
async fn open_verified(
    source: &DatabaseConfig,
    config: &PoolConfig,
) -> Result<Arc<ConnectionPool>, DatabaseError> {
    let timeout = config.connect_timeout();
    let pool = tokio::time::timeout(timeout, async {
        let pool = ConnectionPool::open(source, config.clone()).await?;
        if let Err(e) = pool.ping().await {
            pool.close();
            return Err(e);
        }
        Ok(pool)
    })
    .await
    .map_err(|_| {
        DatabaseError::Connection(format!(
            "'{}' not reachable within {timeout:?}",
            source.name
        ))
    })??;

    if let Err(e) = migrations::run(&pool).await {
        pool.close();
        return Err(e);
    }
    Ok(pool)
}

fn handle_closed() -> DatabaseError {
    DatabaseError::Connection("database handle is closed".into())
}
