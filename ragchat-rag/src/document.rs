//! Data types for retrieved chunks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A chunk of an indexed document returned by a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Identifier of the chunk in the index.
    pub id: String,
    /// The chunk text. This is the passage handed to the model.
    pub text: String,
    /// The similarity score (higher is more relevant).
    pub score: f32,
    /// Remaining string metadata stored alongside the chunk.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, text: impl Into<String>, score: f32) -> Self {
        Self { id: id.into(), text: text.into(), score, metadata: HashMap::new() }
    }
}
