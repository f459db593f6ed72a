//! # ragchat-model
//!
//! Language model clients for ragchat.
//!
//! ## Overview
//!
//! - [`Llm`] - the text-generation seam used by the RAG pipeline
//! - [`OllamaModel`] - Ollama chat API client (`/api/chat`, non-streaming)
//! - [`MockLlm`] - scripted model that records every prompt, for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragchat_model::{Llm, Message, OllamaConfig, OllamaModel};
//!
//! let model = OllamaModel::new(OllamaConfig::new("http://localhost:11434", "mistral"))?;
//! let reply = model
//!     .generate(&[Message::system("Be brief."), Message::user("What is acne?")])
//!     .await?;
//! ```

pub mod error;
pub mod llm;
pub mod message;
pub mod mock;
pub mod ollama;

pub use error::{ModelError, Result};
pub use llm::Llm;
pub use message::{Message, MessageRole};
pub use mock::MockLlm;
pub use ollama::{OllamaConfig, OllamaModel};
