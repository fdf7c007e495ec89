//! Knowledge Base Gateway
//!
//! The agent sees the knowledge base through a single capability,
//! [`KnowledgeGateway::answer`]. Everything behind it (document loading, embeddings,
//! the vector index, prompt construction, the model call) belongs to the gateway.
//!
//! The production implementation is [`RagGateway`]: policy documents from
//! [`corpus`] are embedded into a [`VectorIndex`], the closest documents to a
//! question become the model's context, and Gemini writes the answer.

use async_trait::async_trait;

pub mod corpus;
pub mod gateway;
pub mod index;

pub use corpus::Document;
pub use gateway::RagGateway;
pub use index::VectorIndex;

/// Failure answering a knowledge-base question
///
/// Always recovered by the dispatcher and shown inline; never fatal.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Generation failed: {0}")]
    Generation(String),
}

/// Answers free-text questions from the IT policy corpus
#[async_trait]
pub trait KnowledgeGateway: Send + Sync {
    /// Answer `query`, which may already carry conversation history framing
    async fn answer(&self, query: &str) -> Result<String, GatewayError>;
}
