//! Service layer for ticket persistence.
//!
//! `TicketStore` wraps an [`Executor`] (the connection source). All ticket
//! operations are implemented as `impl TicketStore` in `repos::ticket`.

use crate::DeskDb;
use crate::executor::Executor;

/// Sole mediator between ticket operations and the `tickets` relation.
///
/// Holds no cached rows: every read goes to the store. Share it across tasks
/// behind an `Arc` or with an `Arc`-wrapped executor.
#[derive(Debug)]
pub struct TicketStore<E: Executor = DeskDb> {
    executor: E,
}

impl<E: Executor> TicketStore<E> {
    #[must_use]
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Access the connection source.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }
}
