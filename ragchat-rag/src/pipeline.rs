//! Conversational RAG pipeline.
//!
//! [`RagPipeline::answer`] runs, strictly in order:
//!
//! 1. contextualize the question against the chat history,
//! 2. retrieve passages for the standalone question,
//! 3. join the passages into one context block,
//! 4. build the answer prompt from the context, the history and the
//!    *original* question,
//! 5. generate the answer.
//!
//! The standalone question only drives retrieval. The model always answers
//! the question exactly as the caller asked it.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragchat_rag::{RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .llm(Arc::new(model))
//!     .embedding_provider(Arc::new(embedder))
//!     .vector_store(Arc::new(store))
//!     .build()?;
//!
//! let answer = pipeline.answer("What is Acne?", &[]).await?;
//! ```

use std::sync::Arc;

use ragchat_model::Llm;
use tracing::{error, info};

use crate::config::RagConfig;
use crate::contextualize::QuestionContextualizer;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::format::format_passages;
use crate::history::ChatTurn;
use crate::prompt::{build_chat_prompt, render_qa_system_prompt};
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// The answer pipeline. Construct one via [`RagPipeline::builder()`].
///
/// Holds only shared, immutable handles, so one instance serves every
/// request concurrently.
pub struct RagPipeline {
    llm: Arc<dyn Llm>,
    contextualizer: QuestionContextualizer,
    retriever: Retriever,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the retrieval configuration.
    pub fn config(&self) -> &RagConfig {
        self.retriever.config()
    }

    /// Answer `question` using retrieved context and the prior conversation.
    ///
    /// # Errors
    ///
    /// - [`RagError::ContextualizeError`] if the rewrite call fails,
    /// - [`RagError::EmbeddingError`] / [`RagError::VectorStoreError`] if retrieval fails,
    /// - [`RagError::GenerationError`] if the answer call fails.
    pub async fn answer(&self, question: &str, history: &[ChatTurn]) -> Result<String> {
        // 1. Standalone question for retrieval
        let standalone = self.contextualizer.contextualize(question, history).await?;

        // 2. Retrieve passages
        let passages = self.retriever.retrieve(&standalone).await?;

        // 3. Format context
        let context = format_passages(&passages);

        // 4. Answer prompt uses the caller's question, not the rewrite
        let prompt = build_chat_prompt(render_qa_system_prompt(&context), history, question);

        // 5. Generate
        let answer = self.llm.generate(&prompt).await.map_err(|e| {
            error!(model = self.llm.name(), error = %e, "answer generation failed");
            RagError::GenerationError(e)
        })?;

        info!(
            history_len = history.len(),
            passage_count = passages.len(),
            answer_len = answer.len(),
            "answered question"
        );
        Ok(answer)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `llm`, `embedding_provider` and `vector_store` are required; `config`
/// defaults to [`RagConfig::default()`].
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    llm: Option<Arc<dyn Llm>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
}

impl RagPipelineBuilder {
    /// Set the retrieval configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the model used for both the rewrite and the answer.
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let llm = self.llm.ok_or_else(|| RagError::ConfigError("llm is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let config = self.config.unwrap_or_default();

        Ok(RagPipeline {
            contextualizer: QuestionContextualizer::new(llm.clone()),
            retriever: Retriever::new(embedding_provider, vector_store, config),
            llm,
        })
    }
}
