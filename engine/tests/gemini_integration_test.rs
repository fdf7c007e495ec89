//! Integration tests for the Gemini provider
//!
//! Runs the provider against a local mock of the Gemini REST API. No network
//! access or real API key is needed.

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use helpdesk_engine::config::GeminiConfig;
use helpdesk_engine::llm::{gemini::GeminiProvider, EmbeddingProvider, LLMError, LLMProvider, Message};
use helpdesk_engine::secrets::SecretString;

const TEST_KEY: &str = "test-key-123";

fn provider_for(server: &MockServer) -> GeminiProvider {
    let config = GeminiConfig {
        base_url: server.uri(),
        ..GeminiConfig::default()
    };
    GeminiProvider::new(config, SecretString::new(TEST_KEY))
}

#[tokio::test]
async fn test_generate_sends_prompt_and_joins_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash-latest:generateContent"))
        .and(query_param("key", TEST_KEY))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "How do I get VPN access?"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Step 1. "}, {"text": "Requires Approval."}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let answer = provider
        .generate(&[Message::user("How do I get VPN access?")])
        .await
        .unwrap();

    assert_eq!(answer, "Step 1. Requires Approval.");
    assert_eq!(provider.name(), "gemini");
}

#[tokio::test]
async fn test_generate_maps_system_instruction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash-latest:generateContent"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "Be brief."}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .mount(&server)
        .await;

    let answer = provider_for(&server)
        .generate(&[Message::system("Be brief."), Message::user("hi")])
        .await
        .unwrap();
    assert_eq!(answer, "ok");
}

#[tokio::test]
async fn test_generate_error_statuses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string(format!("API key not valid: {}?key={}", server.uri(), TEST_KEY)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let messages = [Message::user("hello")];

    assert!(matches!(
        provider.generate(&messages).await,
        Err(LLMError::RateLimitExceeded)
    ));

    match provider.generate(&messages).await {
        Err(LLMError::AuthenticationFailed(detail)) => {
            assert!(!detail.contains(TEST_KEY));
            assert!(detail.contains("[REDACTED]"));
        }
        other => panic!("Expected AuthenticationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_without_candidates_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .generate(&[Message::user("hello")])
        .await;
    assert!(matches!(result, Err(LLMError::ParseError(_))));
}

#[tokio::test]
async fn test_batch_embed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/embedding-001:batchEmbedContents"))
        .and(query_param("key", TEST_KEY))
        .and(body_partial_json(json!({
            "requests": [
                {"model": "models/embedding-001", "content": {"parts": [{"text": "first"}]}},
                {"model": "models/embedding-001", "content": {"parts": [{"text": "second"}]}}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [{"values": [0.1, 0.2]}, {"values": [0.3, 0.4]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let embeddings = provider
        .embed(&["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    assert_eq!(embeddings, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    assert_eq!(provider.model(), "models/embedding-001");
}

#[tokio::test]
async fn test_batch_embed_count_mismatch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [{"values": [0.1]}]
        })))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .embed(&["a".to_string(), "b".to_string()])
        .await;
    assert!(matches!(result, Err(LLMError::ParseError(_))));
}

#[tokio::test]
async fn test_embed_empty_input_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let embeddings = provider_for(&server).embed(&[]).await.unwrap();
    assert!(embeddings.is_empty());
}
