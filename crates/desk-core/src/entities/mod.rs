//! Entity structs for helpdesk domain objects.
//!
//! `Ticket` maps to the `tickets` relation. `NewTicket` is the payload used
//! for both creation and full replacement; `TicketFields` is its validated,
//! default-filled form.

mod ticket;

pub use ticket::{NewTicket, Ticket, TicketFields, TicketId};
