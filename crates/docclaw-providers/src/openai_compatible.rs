//! Unified OpenAI-compatible backend client.
//!
//! A single struct that serves both embedding and chat-completion requests
//! against any OpenAI-compatible API. Different deployments are
//! distinguished only by endpoint URL, model ids, and API key.

use async_trait::async_trait;
use serde_json::{Value, json};

use docclaw_core::config::DocclawConfig;
use docclaw_core::error::{DocclawError, Result};
use docclaw_core::traits::{EmbeddingBackend, GenerationBackend};

/// A client for any OpenAI-compatible API, implementing both
/// [`EmbeddingBackend`] and [`GenerationBackend`].
pub struct OpenAiCompatibleClient {
    /// Base URL for the API (e.g., "http://localhost:11434/v1").
    base_url: String,
    /// API key; empty for local servers that need none.
    api_key: String,
    /// Model id used for embedding requests.
    embedding_model: String,
    /// Model id used for chat-completion requests.
    chat_model: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    /// Create from configuration. Falls back to the `OPENAI_API_KEY` env var
    /// when the config carries no key.
    pub fn from_config(config: &DocclawConfig) -> Self {
        let api_key = if config.llm.api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            config.llm.api_key.clone()
        };

        Self {
            base_url: config.llm.endpoint.trim_end_matches('/').to_string(),
            api_key,
            embedding_model: config.llm.embedding_model.clone(),
            chat_model: config.llm.chat_model.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the auth header for the request.
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);
        let req = self.apply_auth(req);

        let resp = req.send().await.map_err(|e| {
            DocclawError::ServiceUnavailable(format!("connection failed ({url}): {e}"))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DocclawError::Provider(format!(
                "API error {status} on {path}: {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| DocclawError::Http(e.to_string()))
    }

    /// Probe the backend by listing models. Used at startup for logging,
    /// not as a gate — the initialize path degrades on its own.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        let req = self.apply_auth(self.client.get(&url));
        match req.send().await {
            Ok(r) => r.status().is_success(),
            Err(e) => {
                tracing::debug!("Health check failed for {url}: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiCompatibleClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = json!({
            "model": self.embedding_model,
            "input": text,
        });
        let json = self.post_json("/embeddings", &body).await?;

        let values = json["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| DocclawError::Provider("No embedding in response".into()))?;

        let mut embedding = Vec::with_capacity(values.len());
        for v in values {
            let f = v.as_f64().ok_or_else(|| {
                DocclawError::Provider("Non-numeric value in embedding".into())
            })?;
            embedding.push(f as f32);
        }
        Ok(embedding)
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatibleClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.chat_model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
        });
        let json = self.post_json("/chat/completions", &body).await?;

        let choice = json["choices"]
            .get(0)
            .ok_or_else(|| DocclawError::Provider("No choices in response".into()))?;
        let content = choice["message"]["content"]
            .as_str()
            .ok_or_else(|| DocclawError::Provider("No content in response".into()))?;
        Ok(content.to_string())
    }
}
