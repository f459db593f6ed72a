//! Ollama embedding provider using the `/api/embed` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const PROVIDER: &str = "Ollama";

/// The default embedding model. Must match the model used to build the index.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

/// Output size of `all-minilm`.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] backed by an Ollama server.
///
/// # Configuration
///
/// - `model` – defaults to `all-minilm`.
/// - `dimensions` – defaults to 384; set it when switching models so the
///   startup check against the index dimension stays accurate.
///
/// # Example
///
/// ```rust,ignore
/// use ragchat_rag::ollama::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new("http://localhost:11434")?;
/// let embedding = provider.embed("what is acne?").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    embed_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbeddingProvider {
    /// Create a provider for the Ollama server at `base_url` using the default model.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = base_url.as_ref().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(RagError::EmbeddingError {
                provider: PROVIDER.into(),
                message: "base URL must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            embed_url: format!("{base_url}/api/embed"),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        })
    }

    /// Set the model name (e.g. `nomic-embed-text`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the value reported by [`EmbeddingProvider::dimensions`].
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn err(message: impl Into<String>) -> RagError {
        RagError::EmbeddingError { provider: PROVIDER.into(), message: message.into() }
    }

    /// Embed `texts` in one request. Output order matches input order.
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = EmbedRequest { model: &self.model, input: texts };

        let response =
            self.client.post(&self.embed_url).json(&request_body).send().await.map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                Self::err(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(Self::err(format!("API returned {status}: {detail}")));
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            Self::err(format!("failed to parse response: {e}"))
        })?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(Self::err(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embed_response.embeddings.len()
            )));
        }

        Ok(embed_response.embeddings)
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| Self::err("API returned no embeddings"))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
