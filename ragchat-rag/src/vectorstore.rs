//! Vector store trait for similarity search over a pre-populated index.

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::error::Result;

/// A read-only similarity search backend.
///
/// Indexes are populated out of band; this service only queries them.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Search `index` for the `top_k` chunks most similar to `embedding`.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(
        &self,
        index: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
