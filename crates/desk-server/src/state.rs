//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use desk_db::{DeskDb, OpContext, TicketStore};

/// The store handlers share, and the deadline each request gets.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<TicketStore<Arc<DeskDb>>>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(db: Arc<DeskDb>, request_timeout: Duration) -> Self {
        Self {
            store: Arc::new(TicketStore::new(db)),
            request_timeout,
        }
    }

    pub fn store(&self) -> &TicketStore<Arc<DeskDb>> {
        &self.store
    }

    /// A fresh context for one request.
    pub fn op_context(&self) -> OpContext {
        OpContext::with_timeout(self.request_timeout)
    }
}
