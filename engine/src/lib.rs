//! IT Helpdesk Engine Library
//!
//! This library provides the core functionality of the helpdesk.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Secret management module
pub mod secrets;

/// LLM and embedding provider abstraction layer
pub mod llm;

/// Knowledge base gateway and retrieval pipeline
pub mod knowledge;

/// Helpdesk agent: command dispatch and conversation memory
pub mod agent;

/// Telemetry and Observability
pub mod telemetry;

/// Terminal REPL adapter
pub mod repl;

/// Web adapter
pub mod web;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
