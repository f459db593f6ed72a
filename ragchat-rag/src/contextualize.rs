//! Rewrites follow-up questions into standalone questions.

use std::sync::Arc;

use ragchat_model::Llm;
use tracing::{debug, error};

use crate::error::{RagError, Result};
use crate::history::ChatTurn;
use crate::prompt::{CONTEXTUALIZE_SYSTEM_PROMPT, build_chat_prompt};

/// Uses the model to make a question self-contained given prior turns.
#[derive(Clone)]
pub struct QuestionContextualizer {
    llm: Arc<dyn Llm>,
}

impl QuestionContextualizer {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// Return a standalone version of `question`.
    ///
    /// With no history the question is returned as is and the model is not
    /// called. Otherwise the model's raw output is returned unvalidated.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ContextualizeError`] if the model call fails.
    pub async fn contextualize(&self, question: &str, history: &[ChatTurn]) -> Result<String> {
        if history.is_empty() {
            return Ok(question.to_string());
        }

        let prompt = build_chat_prompt(CONTEXTUALIZE_SYSTEM_PROMPT.to_string(), history, question);
        let standalone = self.llm.generate(&prompt).await.map_err(|e| {
            error!(model = self.llm.name(), error = %e, "contextualization failed");
            RagError::ContextualizeError(e)
        })?;

        debug!(history_len = history.len(), standalone = %standalone, "question contextualized");
        Ok(standalone)
    }
}
