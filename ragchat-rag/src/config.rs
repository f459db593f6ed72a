//! Configuration for the retrieval step.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Name of the pre-populated index queried by default.
pub const DEFAULT_INDEX_NAME: &str = "medical-chatbot";

/// Number of passages retrieved per question by default.
pub const DEFAULT_TOP_K: usize = 3;

/// Retrieval parameters. Fixed at startup, never taken from a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RagConfig {
    /// Vector index to search.
    pub index_name: String,
    /// Number of top results to request from vector search.
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { index_name: DEFAULT_INDEX_NAME.to_string(), top_k: DEFAULT_TOP_K }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.config.index_name = name.into();
        self
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RagConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `index_name` is blank
    /// - `top_k == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.index_name.trim().is_empty() {
            return Err(RagError::ConfigError("index_name must not be empty".to_string()));
        }
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
