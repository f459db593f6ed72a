//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps every index in a `HashMap` behind a
//! `tokio::sync::RwLock`. It backs tests and local runs without Pinecone.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::SearchResult;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

#[derive(Debug, Clone)]
struct StoredChunk {
    text: String,
    embedding: Vec<f32>,
    metadata: HashMap<String, String>,
}

/// An in-memory vector store using cosine similarity for search.
///
/// Indexes are nested maps: index name → chunk ID → chunk. Searching an
/// index that was never written to is an error, matching a missing remote
/// index.
///
/// # Example
///
/// ```rust,ignore
/// use ragchat_rag::InMemoryVectorStore;
///
/// let store = InMemoryVectorStore::new();
/// store.insert("medical-chatbot", "c1", "Acne is...", vec![0.1, 0.9]).await;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    indexes: RwLock<HashMap<String, HashMap<String, StoredChunk>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a chunk, creating the index on first use.
    pub async fn insert(
        &self,
        index: &str,
        id: impl Into<String>,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) {
        self.insert_with_metadata(index, id, text, embedding, HashMap::new()).await;
    }

    /// Like [`insert`](Self::insert), with metadata returned on every hit.
    pub async fn insert_with_metadata(
        &self,
        index: &str,
        id: impl Into<String>,
        text: impl Into<String>,
        embedding: Vec<f32>,
        metadata: HashMap<String, String>,
    ) {
        let mut indexes = self.indexes.write().await;
        indexes
            .entry(index.to_string())
            .or_default()
            .insert(id.into(), StoredChunk { text: text.into(), embedding, metadata });
    }

    /// Number of chunks stored in `index`.
    pub async fn len(&self, index: &str) -> usize {
        self.indexes.read().await.get(index).map_or(0, HashMap::len)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(
        &self,
        index: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let indexes = self.indexes.read().await;
        let store = indexes.get(index).ok_or_else(|| RagError::VectorStoreError {
            backend: "InMemory".to_string(),
            message: format!("index '{index}' does not exist"),
        })?;

        let mut scored: Vec<SearchResult> = store
            .iter()
            .map(|(id, chunk)| SearchResult {
                id: id.clone(),
                text: chunk.text.clone(),
                score: cosine_similarity(&chunk.embedding, embedding),
                metadata: chunk.metadata.clone(),
            })
            .collect();

        // ties broken by id so results are stable across HashMap iteration orders
        scored.sort_by(|a, b| {
            b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal).then(a.id.cmp(&b.id))
        });
        scored.truncate(top_k);
        Ok(scored)
    }
}
