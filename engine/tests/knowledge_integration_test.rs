//! Integration tests for the retrieval pipeline
//!
//! Uses a keyword-counting embedder and a recording LLM so index building,
//! persistence, rebuild detection and prompt assembly can be checked offline.

use async_trait::async_trait;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use helpdesk_engine::knowledge::{
    corpus, index, Document, GatewayError, KnowledgeGateway, RagGateway, VectorIndex,
};
use helpdesk_engine::llm::{EmbeddingProvider, LLMError, LLMProvider, Message};

const KEYWORDS: [&str; 3] = ["vpn", "printer", "password"];

/// Embeds text as keyword counts and counts how many texts it has embedded
#[derive(Default)]
struct KeywordEmbedder {
    embedded: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn model(&self) -> &str {
        "keyword-test"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LLMError> {
        self.embedded.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                KEYWORDS
                    .iter()
                    .map(|k| lower.matches(k).count() as f32)
                    .collect()
            })
            .collect())
    }
}

/// LLM that records prompts and either echoes a fixed answer or fails
struct RecordingLlm {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingLlm {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            fail,
        })
    }
}

#[async_trait]
impl LLMProvider for RecordingLlm {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, messages: &[Message]) -> Result<String, LLMError> {
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);
        if self.fail {
            Err(LLMError::ProviderUnavailable(
                "upstream down for https://x/?key=AIzaSyA1234567890123456789012345678901234".into(),
            ))
        } else {
            Ok("Allowed. This is based on Policy ID: VPN-001".into())
        }
    }
}

fn write_policies(dir: &TempDir) -> std::path::PathBuf {
    let policies = dir.path().join("it_policies");
    fs::create_dir_all(&policies).unwrap();
    fs::write(policies.join("vpn.md"), "Policy VPN-001: install the VPN client. VPN access is allowed.").unwrap();
    fs::write(policies.join("printer.md"), "Policy PRN-004: printer queues are managed by IT.").unwrap();
    fs::write(policies.join("password.md"), "Policy PWD-002: password resets use the portal.").unwrap();
    policies
}

#[tokio::test]
async fn test_build_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let docs = corpus::load_documents(&write_policies(&dir)).unwrap();
    let index_path = dir.path().join("faiss_index_it_policies").join("index.json");
    let embedder = KeywordEmbedder::default();

    let built = index::load_or_build(&index_path, &docs, &embedder, false)
        .await
        .unwrap();
    assert_eq!(built.len(), 3);
    assert!(index_path.exists());
    assert_eq!(embedder.embedded.load(Ordering::SeqCst), 3);

    // Unchanged corpus reuses the stored index without embedding again
    let reloaded = index::load_or_build(&index_path, &docs, &embedder, false)
        .await
        .unwrap();
    assert_eq!(reloaded.fingerprint(), built.fingerprint());
    assert_eq!(embedder.embedded.load(Ordering::SeqCst), 3);

    // Forced rebuild embeds everything again
    index::load_or_build(&index_path, &docs, &embedder, true)
        .await
        .unwrap();
    assert_eq!(embedder.embedded.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_changed_corpus_triggers_rebuild() {
    let dir = TempDir::new().unwrap();
    let policies = write_policies(&dir);
    let index_path = dir.path().join("index.json");
    let embedder = KeywordEmbedder::default();

    let docs = corpus::load_documents(&policies).unwrap();
    let first = index::load_or_build(&index_path, &docs, &embedder, false)
        .await
        .unwrap();

    fs::write(policies.join("wifi.md"), "Guest wifi needs a password from reception.").unwrap();
    let docs = corpus::load_documents(&policies).unwrap();
    let second = index::load_or_build(&index_path, &docs, &embedder, false)
        .await
        .unwrap();

    assert_eq!(second.len(), 4);
    assert_ne!(first.fingerprint(), second.fingerprint());
}

#[tokio::test]
async fn test_corrupt_index_is_rebuilt() {
    let dir = TempDir::new().unwrap();
    let docs = corpus::load_documents(&write_policies(&dir)).unwrap();
    let index_path = dir.path().join("index.json");
    fs::write(&index_path, "not json").unwrap();

    let index = index::load_or_build(&index_path, &docs, &KeywordEmbedder::default(), false)
        .await
        .unwrap();
    assert_eq!(index.len(), 3);
    assert!(VectorIndex::load(&index_path).is_ok());
}

#[tokio::test]
async fn test_empty_corpus_is_an_error() {
    let dir = TempDir::new().unwrap();
    let index_path = dir.path().join("index.json");

    let result = index::load_or_build(&index_path, &[], &KeywordEmbedder::default(), false).await;
    assert!(result.is_err());
    assert!(!index_path.exists());
}

#[tokio::test]
async fn test_gateway_retrieves_relevant_context() {
    let docs = vec![
        Document::new("vpn.md", "Policy VPN-001: VPN access is allowed."),
        Document::new("printer.md", "Policy PRN-004: printer queues are managed by IT."),
        Document::new("password.md", "Policy PWD-002: password resets use the portal."),
    ];
    let embedder = Arc::new(KeywordEmbedder::default());
    let index = VectorIndex::build(&docs, embedder.as_ref()).await.unwrap();
    let llm = RecordingLlm::new(false);

    let gateway = RagGateway::new(index, embedder, llm.clone(), 1);
    let answer = gateway.answer("How do I set up the VPN?").await.unwrap();

    assert_eq!(answer, "Allowed. This is based on Policy ID: VPN-001");
    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Policy VPN-001"));
    assert!(!prompts[0].contains("PRN-004"));
    assert!(prompts[0].contains("Question:\nHow do I set up the VPN?"));
}

#[tokio::test]
async fn test_gateway_generation_error_is_scrubbed() {
    let docs = vec![Document::new("vpn.md", "VPN policy")];
    let embedder = Arc::new(KeywordEmbedder::default());
    let index = VectorIndex::build(&docs, embedder.as_ref()).await.unwrap();

    let gateway = RagGateway::new(index, embedder, RecordingLlm::new(true), 4);
    match gateway.answer("what is the vpn policy?").await {
        Err(GatewayError::Generation(detail)) => {
            assert!(!detail.contains("AIza"));
            assert!(detail.contains("[REDACTED]"));
        }
        other => panic!("Expected Generation error, got {:?}", other),
    }
}
