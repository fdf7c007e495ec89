//! Retrieval-augmented answering over the policy index

use super::index::VectorIndex;
use super::{GatewayError, KnowledgeGateway};
use crate::llm::{EmbeddingProvider, LLMProvider, Message};
use crate::secrets::scrub_text;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Instructions the model answers under. `{context}` and `{question}` are filled in.
pub const PROMPT_TEMPLATE: &str = r#"
You are an advanced AI IT Helpdesk Agent. Your primary function is to assist employees by consulting a knowledge base of official IT policies and troubleshooting guides. You must adhere to the following rules:

1.  **Consult the Context First:** Use the provided context below to answer the user's question. The context contains official IT documentation.
2.  **Do Not Invent Answers:** If the answer is not in the context, state that you cannot find the information in the knowledge base and recommend creating a ticket.
3.  **Provide Structured Answers:** For "how-to" questions, your answer MUST include these three parts:
    a. A clear, step-by-step checklist for the user to follow.
    b. A status statement: explicitly state if the action is "Allowed," "Denied," or "Requires Approval" based on the policy.
    c. A citation: reference the policy that justifies your response (e.g., "This is based on Policy ID: VPN-001").
4.  **Handle Ambiguity:** If policies conflict or the user's query is missing details (like their role or device), explain which rules you are considering, why there is ambiguity, and what specific information you need to provide a definitive answer.

Context:
{context}

Question:
{question}

Helpful Answer:
"#;

/// Knowledge gateway backed by a vector index and an LLM
pub struct RagGateway {
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LLMProvider>,
    top_k: usize,
}

impl RagGateway {
    pub fn new(
        index: VectorIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LLMProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            llm,
            top_k: top_k.max(1),
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Fill the prompt template
    pub fn build_prompt(context: &str, question: &str) -> String {
        PROMPT_TEMPLATE
            .replace("{context}", context)
            .replace("{question}", question)
    }

    async fn retrieve(&self, query: &str) -> Result<String, GatewayError> {
        let mut embeddings = self
            .embedder
            .embed(&[query.to_string()])
            .await
            .map_err(|e| GatewayError::Retrieval(scrub_text(&e.to_string())))?;

        let query_embedding = embeddings
            .pop()
            .ok_or_else(|| GatewayError::Retrieval("No embedding returned for query".into()))?;

        let hits = self.index.search(&query_embedding, self.top_k);
        debug!(
            hits = hits.len(),
            sources = ?hits.iter().map(|h| h.document.source.as_str()).collect::<Vec<_>>(),
            "Retrieved policy context"
        );

        Ok(hits
            .iter()
            .map(|h| h.document.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[async_trait]
impl KnowledgeGateway for RagGateway {
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    async fn answer(&self, query: &str) -> Result<String, GatewayError> {
        let context = self.retrieve(query).await?;
        let prompt = Self::build_prompt(&context, query);

        self.llm
            .generate(&[Message::user(prompt)])
            .await
            .map_err(|e| GatewayError::Generation(scrub_text(&e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_fills_placeholders() {
        let prompt = RagGateway::build_prompt("Policy VPN-001: use the client.", "How do I connect?");

        assert!(prompt.contains("Context:\nPolicy VPN-001: use the client.\n"));
        assert!(prompt.contains("Question:\nHow do I connect?\n"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
    }
}
