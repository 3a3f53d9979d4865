//! Per-operation deadline and cancellation.
//!
//! Every store operation takes an `OpContext`. The operation future is raced
//! against the deadline and the cancellation token; whichever fires first
//! wins and the in-flight statement future is dropped.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::DatabaseError;

/// Stand-in deadline for timeouts too large to add to `Instant::now()`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Bounded lifetime for a single store operation.
#[derive(Debug, Clone)]
pub struct OpContext {
    deadline: Instant,
    token: CancellationToken,
}

impl OpContext {
    /// Context expiring `timeout` from now. A timeout past the clock's range
    /// is treated as thirty years.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let now = Instant::now();
        Self::with_deadline(now.checked_add(timeout).unwrap_or(now + FAR_FUTURE))
    }

    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline,
            token: CancellationToken::new(),
        }
    }

    /// Tie this context to an external cancellation token (e.g. a child of a
    /// server-wide shutdown token).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Time left before the deadline, zero once it has passed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `op` to completion unless the context expires or is cancelled
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Cancelled` or `DatabaseError::Timeout` when the
    /// context ends first, otherwise whatever `op` returns.
    pub async fn run<T, F>(&self, op: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, DatabaseError>>,
    {
        if self.token.is_cancelled() {
            return Err(DatabaseError::Cancelled);
        }
        if self.remaining().is_zero() {
            return Err(DatabaseError::Timeout);
        }

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(DatabaseError::Cancelled),
            res = tokio::time::timeout_at(self.deadline, op) => {
                res.unwrap_or_else(|_| Err(DatabaseError::Timeout))
            }
        }
    }
}
