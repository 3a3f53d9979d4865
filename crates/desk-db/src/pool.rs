//! Bounded libSQL connection pool.
//!
//! libSQL hands out connections from a `Database` but keeps no pool of its
//! own. `ConnectionPool` adds the process-wide bounds: a semaphore caps the
//! number of connections checked out at once, an idle list caps how many are
//! kept for reuse, and connections older than the configured lifetime are
//! dropped instead of reused.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use desk_config::{DatabaseConfig, PoolConfig};
use libsql::{Builder, Connection, Database};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::DatabaseError;

/// How long a local connection waits on a locked database file.
const BUSY_TIMEOUT_MS: u32 = 5_000;

struct IdleConnection {
    conn: Connection,
    created_at: Instant,
}

/// A bounded set of connections to one libSQL database.
pub struct ConnectionPool {
    db: Database,
    local: bool,
    config: PoolConfig,
    permits: Arc<Semaphore>,
    idle: Mutex<Vec<IdleConnection>>,
    closed: AtomicBool,
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("local", &self.local)
            .field("in_use", &self.in_use())
            .field("idle", &self.idle_count())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl ConnectionPool {
    /// Open the database described by `source`. No connection is made yet
    /// for a remote source; call [`ping`](Self::ping) to verify reachability.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connection` if the database cannot be built.
    pub async fn open(source: &DatabaseConfig, config: PoolConfig) -> Result<Arc<Self>, DatabaseError> {
        let local = source.is_local();
        let db = match source.url() {
            None => Builder::new_local(&source.name).build().await,
            Some(url) => Builder::new_remote(url, source.password.clone()).build().await,
        }
        .map_err(|e| DatabaseError::Connection(format!("open '{}': {e}", source.name)))?;

        if local {
            // WAL is persistent per database file, so set it once here.
            let conn = db
                .connect()
                .map_err(|e| DatabaseError::Connection(e.to_string()))?;
            pragma(&conn, "PRAGMA journal_mode = WAL").await?;
        }

        let permits = Arc::new(Semaphore::new(
            config.max_open_connections.clamp(1, Semaphore::MAX_PERMITS),
        ));
        Ok(Arc::new(Self {
            db,
            local,
            config,
            permits,
            idle: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }))
    }

    /// Check out a connection, waiting while all `max_open_connections` are
    /// in use.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connection` if the pool is closed (including
    /// while waiting) or a new connection cannot be opened.
    pub async fn acquire(self: &Arc<Self>) -> Result<PooledConnection, DatabaseError> {
        if self.is_closed() {
            return Err(closed_error());
        }
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| closed_error())?;

        let (conn, created_at) = match self.take_idle() {
            Some(idle) => (idle.conn, idle.created_at),
            None => (self.new_connection().await?, Instant::now()),
        };

        Ok(PooledConnection {
            conn,
            created_at,
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    /// Run `SELECT 1` on a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connection` if no connection can be acquired or
    /// the probe fails.
    pub async fn ping(self: &Arc<Self>) -> Result<(), DatabaseError> {
        let conn = self.acquire().await?;
        let mut rows = conn
            .query("SELECT 1", ())
            .await
            .map_err(|e| DatabaseError::Connection(format!("ping: {e}")))?;
        rows.next()
            .await
            .map_err(|e| DatabaseError::Connection(format!("ping: {e}")))?;
        Ok(())
    }

    /// Drop every idle connection and refuse further checkouts. Connections
    /// already checked out finish their work and are dropped on return.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.permits.close();
        self.lock_idle().clear();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Connections currently checked out.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.config
            .max_open_connections
            .clamp(1, Semaphore::MAX_PERMITS)
            .saturating_sub(self.permits.available_permits())
    }

    /// Connections parked for reuse.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.lock_idle().len()
    }

    fn lock_idle(&self) -> std::sync::MutexGuard<'_, Vec<IdleConnection>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expired(&self, created_at: Instant) -> bool {
        let lifetime = self.config.conn_max_lifetime();
        !lifetime.is_zero() && created_at.elapsed() >= lifetime
    }

    fn take_idle(&self) -> Option<IdleConnection> {
        let mut idle = self.lock_idle();
        while let Some(candidate) = idle.pop() {
            if !self.expired(candidate.created_at) {
                return Some(candidate);
            }
        }
        None
    }

    fn check_in(&self, conn: Connection, created_at: Instant) {
        if self.is_closed() || self.expired(created_at) {
            return;
        }
        let mut idle = self.lock_idle();
        if idle.len() < self.config.max_idle_connections {
            idle.push(IdleConnection { conn, created_at });
        }
    }

    async fn new_connection(&self) -> Result<Connection, DatabaseError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        if self.local {
            pragma(&conn, &format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}")).await?;
        }
        Ok(conn)
    }
}

/// PRAGMAs that report their new value return a row, so they go through
/// `query` and the row has to be stepped for the statement to run.
async fn pragma(conn: &Connection, sql: &str) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query(sql, ())
        .await
        .map_err(|e| DatabaseError::Connection(format!("{sql}: {e}")))?;
    rows.next()
        .await
        .map_err(|e| DatabaseError::Connection(format!("{sql}: {e}")))?;
    Ok(())
}

fn closed_error() -> DatabaseError {
    DatabaseError::Connection("connection pool is closed".into())
}

/// A connection checked out of a [`ConnectionPool`].
///
/// Dereferences to [`libsql::Connection`]. Dropping it returns the connection
/// to the idle list (when there is room and it has not expired) and frees its
/// slot for the next caller.
pub struct PooledConnection {
    conn: Connection,
    created_at: Instant,
    pool: Arc<ConnectionPool>,
    // Released after `Drop::drop` has checked the connection back in.
    _permit: OwnedSemaphorePermit,
}

impl std::fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledConnection")
            .field("age", &self.created_at.elapsed())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        self.pool.check_in(self.conn.clone(), self.created_at);
    }
}
