//! Embed-then-search retrieval over a fixed index.

use std::sync::Arc;

use tracing::{debug, error};

use crate::config::RagConfig;
use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Retrieves the passages most similar to a query.
///
/// The index name and result count come from [`RagConfig`] and are the same
/// for every call.
#[derive(Clone)]
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    config: RagConfig,
}

impl Retriever {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        config: RagConfig,
    ) -> Self {
        Self { embedding_provider, vector_store, config }
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Embed `query` and return the `top_k` nearest chunks, most similar first.
    ///
    /// # Errors
    ///
    /// Propagates the provider's `EmbeddingError` or the store's
    /// `VectorStoreError` unchanged.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let embedding = self.embedding_provider.embed(query).await.inspect_err(|e| {
            error!(error = %e, "query embedding failed");
        })?;

        let index = self.config.index_name.as_str();
        let top_k = self.config.top_k;
        let results =
            self.vector_store.search(index, &embedding, top_k).await.inspect_err(|e| {
                error!(index, error = %e, "vector store search failed");
            })?;

        debug!(index, top_k, result_count = results.len(), "retrieval completed");
        Ok(results)
    }

    /// Like [`search`](Self::search), keeping only the passage text.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        Ok(self.search(query).await?.into_iter().map(|r| r.text).collect())
    }
}
