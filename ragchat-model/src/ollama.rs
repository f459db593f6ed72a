//! Ollama chat client.
//!
//! Calls `POST {base_url}/api/chat` with `stream: false` and returns the
//! assistant message content.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragchat_model::{OllamaConfig, OllamaModel};
//!
//! let model = OllamaModel::new(OllamaConfig::new("http://localhost:11434", "mistral"))?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::llm::Llm;
use crate::message::Message;

const PROVIDER: &str = "Ollama";

/// The default Ollama base URL.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// The default generation model.
pub const DEFAULT_OLLAMA_MODEL: &str = "mistral";

/// Configuration for [`OllamaModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server, without a trailing slash.
    pub base_url: String,
    /// Model tag, e.g. `mistral` or `llama3.1:8b`.
    pub model: String,
    /// Sampling temperature. Uses the model default when unset.
    pub temperature: Option<f32>,
}

impl OllamaConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), model: model.into(), temperature: None }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL)
    }
}

/// An [`Llm`] backed by a local or remote Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaModel {
    client: reqwest::Client,
    chat_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OllamaModel {
    /// Create a new client. Fails if the base URL or model name is empty.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ModelError::InvalidConfig("Ollama base URL must not be empty".into()));
        }
        if config.model.trim().is_empty() {
            return Err(ModelError::InvalidConfig("Ollama model must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            chat_url: format!("{base_url}/api/chat"),
            model: config.model,
            temperature: config.temperature,
        })
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── Llm implementation ─────────────────────────────────────────────

#[async_trait]
impl Llm for OllamaModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, messages: &[Message]) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.model,
            message_count = messages.len(),
            "chat request"
        );

        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: self.temperature.map(|temperature| ChatOptions { temperature }),
        };

        let response =
            self.client.post(&self.chat_url).json(&body).send().await.map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                ModelError::Request { provider: PROVIDER.into(), message: e.to_string() }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&text).map(|e| e.error).unwrap_or(text);

            error!(provider = PROVIDER, %status, "API error");
            return Err(ModelError::Api {
                provider: PROVIDER.into(),
                status: status.as_u16(),
                message: detail,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            ModelError::InvalidResponse { provider: PROVIDER.into(), message: e.to_string() }
        })?;

        debug!(provider = PROVIDER, reply_len = chat.message.content.len(), "chat reply");
        Ok(chat.message.content)
    }
}
