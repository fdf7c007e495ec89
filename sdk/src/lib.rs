//! Helpdesk SDK
//!
//! Shared domain types for the helpdesk engine and its presentation adapters:
//! tickets, the ticket registry, and the engine error type. This crate does no I/O.

/// Error types and handling
pub mod errors;

/// Ticket record and status state machine
pub mod ticket;

/// In-memory ticket registry
pub mod registry;

// Re-export commonly used types
pub use errors::{EngineError, HelpdeskErrorExt};
pub use registry::TicketRegistry;
pub use ticket::{LogEntry, Ticket, TicketStatus};
