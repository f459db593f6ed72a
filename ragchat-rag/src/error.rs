//! Error types for the `ragchat-rag` crate.

use ragchat_model::ModelError;
use thiserror::Error;

/// Errors that can occur in RAG operations.
///
/// Each pipeline stage fails with its own variant so callers can tell which
/// step broke without parsing messages.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The model call that rewrites a follow-up into a standalone question failed.
    #[error("Question contextualization failed: {0}")]
    ContextualizeError(#[source] ModelError),

    /// The model call that produces the final answer failed.
    #[error("Answer generation failed: {0}")]
    GenerationError(#[source] ModelError),
}

impl RagError {
    /// True for failures of the embed-and-search step.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::EmbeddingError { .. } | Self::VectorStoreError { .. })
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
