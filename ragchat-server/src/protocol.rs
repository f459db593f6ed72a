//! JSON bodies of the HTTP API.

use ragchat_rag::ChatTurn;
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
}

/// Successful reply to `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Body of every error the service produces itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `generation_failed`.
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_history_defaults_to_empty() {
        let request: ChatRequest =
            serde_json::from_value(json!({"question": "What is Acne?"})).unwrap();
        assert_eq!(request.question, "What is Acne?");
        assert!(request.chat_history.is_empty());
    }

    #[test]
    fn question_is_required() {
        assert!(serde_json::from_value::<ChatRequest>(json!({"chat_history": []})).is_err());
    }
}
