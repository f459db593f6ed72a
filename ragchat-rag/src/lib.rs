//! # ragchat-rag
//!
//! Conversational retrieval-augmented generation.
//!
//! A question and its chat history go through [`RagPipeline::answer`]:
//! the question is made standalone, passages are retrieved from a
//! pre-populated vector index, and the model answers from those passages.
//!
//! ## Components
//!
//! - [`EmbeddingProvider`] / [`OllamaEmbeddingProvider`] - query embeddings
//! - [`VectorStore`] / [`PineconeVectorStore`] / [`InMemoryVectorStore`] - similarity search
//! - [`Retriever`] - embed + search against the configured index
//! - [`QuestionContextualizer`] - follow-up → standalone question
//! - [`format_passages`] - context block for the answer prompt
//! - [`prompt`] - the two prompt templates
//!
//! Indexing documents is out of scope; the index is populated beforehand.

pub mod config;
pub mod contextualize;
pub mod document;
pub mod embedding;
pub mod error;
pub mod format;
pub mod history;
pub mod inmemory;
pub mod ollama;
pub mod pinecone;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod vectorstore;

pub use config::{DEFAULT_INDEX_NAME, DEFAULT_TOP_K, RagConfig, RagConfigBuilder};
pub use contextualize::QuestionContextualizer;
pub use document::SearchResult;
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use format::format_passages;
pub use history::{ChatTurn, Role};
pub use inmemory::InMemoryVectorStore;
pub use ollama::OllamaEmbeddingProvider;
pub use pinecone::{IndexDescription, PineconeConfig, PineconeVectorStore};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
