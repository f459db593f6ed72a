//! The text-generation trait implemented by every model client.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// A language model that turns a chat prompt into text.
///
/// Implementations are constructed once and shared behind an `Arc`, so they
/// must be `Send + Sync` and must not require `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// use ragchat_model::{Llm, Message};
///
/// let text = model.generate(&[Message::user("hello")]).await?;
/// ```
#[async_trait]
pub trait Llm: Send + Sync {
    /// Name of the underlying model, used in logs.
    fn name(&self) -> &str;

    /// Generate a complete (non-streamed) reply for the given messages.
    async fn generate(&self, messages: &[Message]) -> Result<String>;
}
