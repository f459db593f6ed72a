//! Pinecone vector store backend.
//!
//! Provides [`PineconeVectorStore`], which implements [`VectorStore`] over
//! Pinecone's REST API with `reqwest`:
//!
//! - the control plane (`GET {control_plane}/indexes/{name}`) resolves an
//!   index name to its data-plane host,
//! - the data plane (`POST https://{host}/query`) runs the similarity search.
//!
//! Chunk text is read from the `text` metadata key, the key LangChain-style
//! ingestion writes page content under.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragchat_rag::pinecone::{PineconeConfig, PineconeVectorStore};
//!
//! let store = PineconeVectorStore::new(PineconeConfig::new(api_key))?;
//! let index = store.describe_index("medical-chatbot").await?;
//! let results = store.search("medical-chatbot", &query_embedding, 3).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::document::SearchResult;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "pinecone";

/// The public Pinecone control plane.
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

/// API version sent in `X-Pinecone-API-Version`.
pub const PINECONE_API_VERSION: &str = "2024-07";

/// Metadata key holding the chunk text.
pub const TEXT_METADATA_KEY: &str = "text";

/// Connection settings for [`PineconeVectorStore`].
#[derive(Clone, PartialEq)]
pub struct PineconeConfig {
    pub api_key: String,
    pub control_plane_url: String,
    /// Search within this namespace; the default namespace when unset.
    pub namespace: Option<String>,
}

impl PineconeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
            namespace: None,
        }
    }

    pub fn with_control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

// keeps the API key out of logs
impl std::fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("api_key", &"<redacted>")
            .field("control_plane_url", &self.control_plane_url)
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// Index details reported by the control plane.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: usize,
    #[serde(default)]
    pub metric: Option<String>,
    pub host: String,
    #[serde(default)]
    pub status: Option<IndexStatus>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexStatus {
    pub ready: bool,
    #[serde(default)]
    pub state: Option<String>,
}

/// A [`VectorStore`] backed by [Pinecone](https://www.pinecone.io/).
///
/// Index hosts are resolved once per index and kept for the lifetime of the
/// store.
pub struct PineconeVectorStore {
    client: reqwest::Client,
    config: PineconeConfig,
    hosts: RwLock<HashMap<String, String>>,
}

impl PineconeVectorStore {
    /// Create a store. Fails if the API key is empty.
    pub fn new(config: PineconeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RagError::ConfigError("Pinecone API key must not be empty".to_string()));
        }
        let config = PineconeConfig {
            control_plane_url: config.control_plane_url.trim_end_matches('/').to_string(),
            ..config
        };
        Ok(Self { client: reqwest::Client::new(), config, hosts: RwLock::default() })
    }

    fn err(message: impl Into<String>) -> RagError {
        RagError::VectorStoreError { backend: BACKEND.to_string(), message: message.into() }
    }

    /// Describe `index` through the control plane and remember its host.
    pub async fn describe_index(&self, index: &str) -> Result<IndexDescription> {
        let url = format!("{}/indexes/{index}", self.config.control_plane_url);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .send()
            .await
            .map_err(|e| {
                error!(index, error = %e, "describe index request failed");
                Self::err(format!("describe index '{index}' failed: {e}"))
            })?;

        let response = Self::check_status(response, index).await?;
        let description: IndexDescription = response.json().await.map_err(|e| {
            Self::err(format!("failed to parse description of index '{index}': {e}"))
        })?;

        debug!(
            index,
            host = %description.host,
            dimension = description.dimension,
            "resolved pinecone index"
        );
        self.hosts.write().await.insert(index.to_string(), description.host.clone());
        Ok(description)
    }

    async fn host_for(&self, index: &str) -> Result<String> {
        if let Some(host) = self.hosts.read().await.get(index) {
            return Ok(host.clone());
        }
        Ok(self.describe_index(index).await?.host)
    }

    async fn check_status(response: reqwest::Response, index: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        error!(index, %status, "pinecone API error");
        Err(Self::err(format!("API returned {status} for index '{index}': {detail}")))
    }
}

/// Data-plane base URL for a host reported by the control plane.
///
/// Pinecone reports bare hostnames; hosts that already carry a scheme are
/// used as given.
fn data_plane_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Flatten a metadata value to a string. Nested values keep their JSON form.
fn metadata_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Pinecone API request/response types ────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Map<String, Value>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── VectorStore implementation ─────────────────────────────────────

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn search(
        &self,
        index: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let host = self.host_for(index).await?;
        let url = format!("{}/query", data_plane_url(&host));

        let body = QueryRequest {
            vector: embedding,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.config.namespace.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(index, error = %e, "query request failed");
                Self::err(format!("query on index '{index}' failed: {e}"))
            })?;

        let response = Self::check_status(response, index).await?;
        let query: QueryResponse = response
            .json()
            .await
            .map_err(|e| Self::err(format!("failed to parse query response: {e}")))?;

        let mut results = Vec::with_capacity(query.matches.len());
        for m in query.matches {
            let mut metadata: HashMap<String, String> = m
                .metadata
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k, metadata_string(&v)))
                .collect();
            let Some(text) = metadata.remove(TEXT_METADATA_KEY) else {
                warn!(index, id = %m.id, "match has no text metadata, skipping");
                continue;
            };
            results.push(SearchResult { id: m.id, text, score: m.score, metadata });
        }

        debug!(index, top_k, count = results.len(), "pinecone query completed");
        Ok(results)
    }
}
