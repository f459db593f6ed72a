//! Scripted [`Llm`] for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::Llm;
use crate::message::Message;

/// A mock model that replays scripted replies and records every prompt.
///
/// Replies are consumed in order. Once the script is exhausted the fallback
/// reply is returned, or an error if there is none.
///
/// ```rust,ignore
/// let llm = MockLlm::with_replies(["standalone question", "final answer"]);
/// ```
#[derive(Debug, Default)]
pub struct MockLlm {
    name: String,
    script: Mutex<VecDeque<Result<String>>>,
    fallback: Option<String>,
    failure: Option<String>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// A mock that answers every call with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { name: "mock".into(), fallback: Some(reply.into()), ..Default::default() }
    }

    /// A mock that answers calls with `replies` in order, then errors.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = replies.into_iter().map(|r| Ok(r.into())).collect();
        Self { name: "mock".into(), script: Mutex::new(script), ..Default::default() }
    }

    /// A mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { name: "mock".into(), failure: Some(message.into()), ..Default::default() }
    }

    /// Queue a failure after the currently scripted replies.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).push_back(Err(ModelError::Mock(
            message.into(),
        )));
        self
    }

    /// Every prompt received so far, in call order.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, messages: &[Message]) -> Result<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(messages.to_vec());

        if let Some(message) = &self.failure {
            return Err(ModelError::Mock(message.clone()));
        }

        let next = self.script.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        match next {
            Some(reply) => reply,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ModelError::Mock("no scripted reply left".into())),
        }
    }
}
