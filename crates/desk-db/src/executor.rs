//! The connection source the ticket store depends on.

use std::future::Future;
use std::sync::Arc;

use crate::error::DatabaseError;
use crate::pool::PooledConnection;

/// Anything that can hand out a pooled connection.
///
/// The store only ever sees this trait, never the pool handle itself, so a
/// reconnect can replace the pool without the store noticing.
pub trait Executor: Send + Sync {
    /// Check out a connection from the current pool.
    fn acquire(&self) -> impl Future<Output = Result<PooledConnection, DatabaseError>> + Send;
}

impl<E: Executor> Executor for Arc<E> {
    fn acquire(&self) -> impl Future<Output = Result<PooledConnection, DatabaseError>> + Send {
        (**self).acquire()
    }
}
