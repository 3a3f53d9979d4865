//! Repository modules implementing the store operations.
//!
//! Each module adds methods to `TicketStore` via `impl TicketStore` blocks.

pub mod ticket;
