//! Vector index over the policy corpus
//!
//! Documents are embedded once and persisted as JSON next to a fingerprint of the
//! corpus they were built from. On startup the stored index is reused unless it
//! fails to load or the corpus has changed.

use super::corpus::{self, Document};
use crate::llm::EmbeddingProvider;
use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Format version of the persisted index
const INDEX_VERSION: u32 = 1;

/// Maximum texts per embedding request
const EMBED_BATCH_SIZE: usize = 100;

/// A document together with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub source: String,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A search result
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub document: &'a IndexedDocument,
    pub score: f32,
}

/// In-memory cosine-similarity index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    version: u32,
    embedding_model: String,
    fingerprint: String,
    documents: Vec<IndexedDocument>,
}

impl VectorIndex {
    /// Embed `documents` and build a new index
    pub async fn build(
        documents: &[Document],
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self, EngineError> {
        let fingerprint = corpus::fingerprint(documents, embedder.model());
        let mut indexed = Vec::with_capacity(documents.len());

        for batch in documents.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|d| d.content.clone()).collect();
            let embeddings = embedder
                .embed(&texts)
                .await
                .map_err(|e| EngineError::LLMProvider(format!("Embedding failed: {}", e)))?;

            if embeddings.len() != batch.len() {
                return Err(EngineError::KnowledgeBase(format!(
                    "Embedding provider returned {} vectors for {} documents",
                    embeddings.len(),
                    batch.len()
                )));
            }

            indexed.extend(batch.iter().zip(embeddings).map(|(doc, embedding)| {
                IndexedDocument {
                    source: doc.source.clone(),
                    content: doc.content.clone(),
                    embedding,
                }
            }));
        }

        Ok(Self {
            version: INDEX_VERSION,
            embedding_model: embedder.model().to_string(),
            fingerprint,
            documents: indexed,
        })
    }

    /// Load a persisted index
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)?;
        let index: VectorIndex = serde_json::from_str(&contents)?;

        if index.version != INDEX_VERSION {
            return Err(EngineError::KnowledgeBase(format!(
                "Unsupported index version {} (expected {})",
                index.version, INDEX_VERSION
            )));
        }

        Ok(index)
    }

    /// Persist the index, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// The `k` documents most similar to `query`, best first
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit<'_>> {
        let mut hits: Vec<SearchHit<'_>> = self
            .documents
            .iter()
            .map(|document| SearchHit {
                document,
                score: cosine_similarity(query, &document.embedding),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        hits
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Load the index at `path`, or build and save a fresh one.
///
/// A stored index is reused when it loads cleanly and either matches the corpus
/// fingerprint or the corpus is empty. An index that fails to load is rebuilt.
/// Building from an empty corpus is an error.
pub async fn load_or_build(
    path: &Path,
    documents: &[Document],
    embedder: &dyn EmbeddingProvider,
    force_rebuild: bool,
) -> Result<VectorIndex, EngineError> {
    if path.exists() && !force_rebuild {
        info!("Loading existing vector store from '{}'...", path.display());
        match VectorIndex::load(path) {
            Ok(index) if documents.is_empty() => {
                warn!("No policy documents found; using the stored index as-is");
                return Ok(index);
            }
            Ok(index) if index.fingerprint == corpus::fingerprint(documents, embedder.model()) => {
                return Ok(index);
            }
            Ok(_) => info!("Policy documents changed since the index was built. Rebuilding..."),
            Err(e) => warn!("Error loading vector store: {}. Rebuilding...", e),
        }
    }

    if documents.is_empty() {
        return Err(EngineError::KnowledgeBase(
            "No policy documents found. The agent cannot answer policy questions".to_string(),
        ));
    }

    info!(
        "Loaded {} policy documents. Creating embeddings...",
        documents.len()
    );
    let index = VectorIndex::build(documents, embedder).await?;
    index.save(path)?;
    info!("Vector store created and saved to '{}'.", path.display());

    Ok(index)
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
