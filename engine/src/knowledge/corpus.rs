//! Policy document corpus
//!
//! Loads every Markdown file under the policies directory, recursively. Files are
//! returned in path order so the corpus fingerprint is stable across runs.

use sdk::errors::EngineError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One policy or troubleshooting document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path the document was loaded from, relative to the policies directory
    pub source: String,

    /// Full text of the document
    pub content: String,
}

impl Document {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

/// Create the policies directory if it is missing.
///
/// Returns `true` when the directory was created, so the caller can tell the user
/// where to put their policy files.
pub fn ensure_policies_dir(dir: &Path) -> Result<bool, EngineError> {
    if dir.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(dir).map_err(|e| {
        EngineError::KnowledgeBase(format!(
            "Failed to create policies directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    warn!(
        "Created directory '{}'. Please add your IT policy/guide files (.md) there.",
        dir.display()
    );
    Ok(true)
}

/// Load all `*.md` files under `dir`.
///
/// Files that are empty or whitespace-only are skipped.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>, EngineError> {
    let mut paths = Vec::new();
    collect_markdown(dir, &mut paths)?;
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path).map_err(|e| {
            EngineError::KnowledgeBase(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if content.trim().is_empty() {
            debug!("Skipping empty document {}", path.display());
            continue;
        }

        let source = path
            .strip_prefix(dir)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        documents.push(Document { source, content });
    }

    debug!("Loaded {} policy documents from {}", documents.len(), dir.display());
    Ok(documents)
}

fn collect_markdown(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), EngineError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        EngineError::KnowledgeBase(format!("Failed to read {}: {}", dir.display(), e))
    })?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed; a link cycle would never terminate
        if entry.file_type()?.is_dir() {
            collect_markdown(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            out.push(path);
        }
    }

    Ok(())
}

/// SHA-256 over the embedding model name and every document's source and content
pub fn fingerprint(documents: &[Document], embedding_model: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(embedding_model.as_bytes());
    for doc in documents {
        hasher.update([0u8]);
        hasher.update(doc.source.as_bytes());
        hasher.update([0u8]);
        hasher.update(doc.content.as_bytes());
    }
    hex::encode(hasher.finalize())
}
