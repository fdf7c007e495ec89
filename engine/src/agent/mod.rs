//! Helpdesk Agent
//!
//! Command parsing, the bounded conversation memory, and the agent that ties
//! tickets, memory and the knowledge gateway together behind `process`.

pub mod core;
pub mod dispatcher;
pub mod working_memory;

pub use core::{HelpdeskAgent, FAREWELL_MESSAGE, MEMORY_CLEARED_MESSAGE};
pub use dispatcher::{is_question, Command, UsageError};
pub use working_memory::ConversationMemory;
