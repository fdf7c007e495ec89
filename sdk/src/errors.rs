//! Error types and handling
//!
//! This module provides the error type used by the helpdesk engine outside of the
//! dispatcher. Dispatcher-level failures (bad commands, unknown tickets, knowledge
//! base errors) are rendered to user-facing strings and never reach this type;
//! `EngineError` covers startup and adapter failures.
//!
//! # Security
//!
//! Error messages must never carry API keys. Callers that wrap upstream error
//! text are expected to scrub it first.

use thiserror::Error;

/// Trait for helpdesk error extensions
///
/// Provides a user-friendly hint and whether the failure can be retried without
/// operator intervention.
pub trait HelpdeskErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Configuration**: invalid or unreadable config file
/// - **Secrets**: missing API key
/// - **Knowledge base**: empty corpus, unreadable or unbuildable index
/// - **LLM provider**: generation or embedding call failed
/// - **Network**: adapter could not bind or serve
///
/// # Examples
///
/// ```
/// use sdk::errors::{EngineError, HelpdeskErrorExt};
///
/// let error = EngineError::Secret("GOOGLE_API_KEY not set".to_string());
/// assert!(!error.is_recoverable());
/// println!("Hint: {}", error.user_hint());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Secret errors
    #[error("Secret error: {0}")]
    Secret(String),

    // Knowledge base errors
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    // LLM provider errors
    #[error("LLM provider error: {0}")]
    LLMProvider(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HelpdeskErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Secret(_) => {
                "Set GOOGLE_API_KEY in the environment or a .env file in the working directory"
            }
            Self::KnowledgeBase(_) => {
                "Add IT policy files (.md) to the policies directory, then run 'helpdesk index --rebuild'"
            }
            Self::LLMProvider(_) => "LLM provider unavailable. Check your API key and network",
            Self::Network(_) => "Network operation failed. Check the host and port settings",
            Self::Serialization(_) => "Stored data is malformed. Try rebuilding the index",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Secret(_) | Self::KnowledgeBase(_) => false,
            _ => true,
        }
    }
}
