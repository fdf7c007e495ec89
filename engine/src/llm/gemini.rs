use super::{EmbeddingProvider, LLMError, LLMProvider, Message, MessageRole};
use crate::config::GeminiConfig;
use crate::secrets::{scrub_text, SecretString};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Google Gemini provider for both generation and embeddings
pub struct GeminiProvider {
    config: GeminiConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to build HTTP client with a {}s timeout, using defaults: {}",
                    config.timeout_secs,
                    e
                );
                reqwest::Client::new()
            });

        Self {
            config,
            api_key,
            client,
        }
    }

    /// Embedding model name in the `models/<name>` form the API expects
    fn embedding_model_path(&self) -> String {
        let model = self.config.embedding_model.as_str();
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        }
    }

    async fn post(&self, url: &str, payload: &serde_json::Value) -> super::Result<serde_json::Value> {
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.unsecure())])
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LLMError::Timeout
                } else {
                    LLMError::NetworkError(scrub_text(&e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = scrub_text(&response.text().await.unwrap_or_default());

            return Err(match status.as_u16() {
                400 | 404 => LLMError::InvalidRequest(text),
                429 => LLMError::RateLimitExceeded,
                401 | 403 => LLMError::AuthenticationFailed(text),
                _ => LLMError::ProviderUnavailable(format!(
                    "Gemini API error ({}): {}",
                    status, text
                )),
            });
        }

        response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(scrub_text(&e.to_string())))
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, messages: &[Message]) -> super::Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let mut contents = Vec::new();
        let mut system_instruction = None;

        for msg in messages {
            if msg.role == MessageRole::System {
                system_instruction = Some(json!({
                    "parts": [{"text": msg.content}]
                }));
                continue;
            }

            contents.push(json!({
                "role": if msg.role == MessageRole::Assistant { "model" } else { "user" },
                "parts": [{"text": msg.content}]
            }));
        }

        let mut payload = serde_json::Map::new();
        payload.insert("contents".to_string(), json!(contents));
        payload.insert(
            "generationConfig".to_string(),
            json!({ "temperature": self.config.temperature }),
        );

        if let Some(sys) = system_instruction {
            payload.insert("systemInstruction".to_string(), sys);
        }

        let data = self.post(&url, &serde_json::Value::Object(payload)).await?;

        let candidate = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| LLMError::ParseError("No candidates in response".to_string()))?;

        let content_item = candidate
            .get("content")
            .ok_or_else(|| LLMError::ParseError("No content in candidate".to_string()))?;

        let parts = content_item
            .get("parts")
            .and_then(|p| p.as_array())
            .ok_or_else(|| LLMError::ParseError("No parts in candidate content".to_string()))?;

        let mut full_text = String::new();
        for part in parts {
            if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                full_text.push_str(text);
            }
        }

        tracing::debug!(chars = full_text.len(), "Gemini generation complete");
        Ok(full_text)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiProvider {
    fn model(&self) -> &str {
        &self.config.embedding_model
    }

    async fn embed(&self, texts: &[String]) -> super::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.embedding_model_path();
        let url = format!("{}/{}:batchEmbedContents", self.config.base_url, model);

        let requests: Vec<serde_json::Value> = texts
            .iter()
            .map(|text| {
                json!({
                    "model": model,
                    "content": { "parts": [{ "text": text }] }
                })
            })
            .collect();

        let data = self.post(&url, &json!({ "requests": requests })).await?;

        let parsed: BatchEmbedResponse = serde_json::from_value(data)
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        if parsed.embeddings.len() != texts.len() {
            return Err(LLMError::ParseError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.embeddings.len()
            )));
        }

        tracing::debug!(count = texts.len(), model = %model, "Gemini embeddings complete");
        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }
}
