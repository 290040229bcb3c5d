//! HTTP-backed embedding provider.
//!
//! Supports the payload and response shapes of OpenAI-style and
//! HuggingFace-style embedding endpoints plus a plain custom shape.
//! Per-call failures surface as [`EmbeddingError`] and are handled at
//! the per-meal level by the orchestrator; no retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::traits::{EmbeddingError, EmbeddingProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProviderKind {
    OpenAi,
    HuggingFace,
    Custom,
}

/// Configuration for [`HttpEmbeddingProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Endpoint URL, required.
    pub api_url: String,

    /// Full value for the `Authorization` header, if the endpoint needs
    /// one (e.g. `"Bearer sk-…"`).
    #[serde(default)]
    pub api_auth_header: Option<String>,

    /// Provider dialect: `"openai"`, `"hf"`/`"huggingface"`, or
    /// anything else for the custom shape.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name, sent where the dialect expects one.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model_name() -> String {
    "text-embedding-3-small".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl EmbeddingConfig {
    fn kind(&self) -> ProviderKind {
        match self.provider.to_ascii_lowercase().as_str() {
            "openai" | "gpt" => ProviderKind::OpenAi,
            "hf" | "huggingface" => ProviderKind::HuggingFace,
            _ => ProviderKind::Custom,
        }
    }
}

/// Embedding provider that POSTs meal text to an HTTP endpoint.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    cfg: EmbeddingConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(cfg: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        if cfg.api_url.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig("api_url is required".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig(e.to_string()))?;
        Ok(Self { client, cfg })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let payload = build_payload(self.cfg.kind(), text, &self.cfg.model_name);

        let mut request = self.client.post(&self.cfg.api_url).json(&payload);
        if let Some(header) = self.cfg.api_auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::Request(format!(
                "endpoint returned {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Response(e.to_string()))?;
        parse_embedding(body)
    }
}

fn build_payload(kind: ProviderKind, text: &str, model_name: &str) -> Value {
    match kind {
        ProviderKind::OpenAi => json!({ "input": text, "model": model_name }),
        ProviderKind::HuggingFace => json!({ "inputs": text }),
        ProviderKind::Custom => json!({ "text": text }),
    }
}

/// Extract a single embedding vector from the known response shapes:
/// `{"data":[{"embedding":[…]}]}`, `{"embeddings":[…]}` (flat or
/// nested), or a bare array.
fn parse_embedding(value: Value) -> Result<Vec<f32>, EmbeddingError> {
    match value {
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("data") {
                let first = items.into_iter().next().ok_or_else(|| {
                    EmbeddingError::Response("empty `data` array in response".into())
                })?;
                let embedding = first.get("embedding").cloned().ok_or_else(|| {
                    EmbeddingError::Response("missing `embedding` field in data item".into())
                })?;
                return parse_vector(embedding);
            }
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_first_vector(embeddings);
            }
            if let Some(embedding) = map.remove("embedding") {
                return parse_vector(embedding);
            }
            Err(EmbeddingError::Response(
                "unsupported response shape".into(),
            ))
        }
        other => parse_first_vector(other),
    }
}

fn parse_first_vector(value: Value) -> Result<Vec<f32>, EmbeddingError> {
    match value {
        Value::Array(items) if items.iter().all(|i| matches!(i, Value::Array(_))) => {
            let first = items
                .into_iter()
                .next()
                .ok_or_else(|| EmbeddingError::Response("response contained no embeddings".into()))?;
            parse_vector(first)
        }
        other => parse_vector(other),
    }
}

fn parse_vector(value: Value) -> Result<Vec<f32>, EmbeddingError> {
    let Value::Array(values) = value else {
        return Err(EmbeddingError::Response(
            "embedding vector must be an array".into(),
        ));
    };
    values
        .into_iter()
        .map(|entry| {
            entry
                .as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| EmbeddingError::Response("non-numeric embedding entry".into()))
        })
        .collect()
}
