//! # desk-core
//!
//! Core types and error types for the helpdesk ticket service.
//!
//! This crate provides the foundational types shared across all desk crates:
//! - The `Ticket` record and the `NewTicket` create/update payload
//! - The ticket status vocabulary and the list sort vocabulary
//! - Cross-cutting error types
//! - HTTP response envelopes

pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;
