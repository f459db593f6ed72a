//! Chat history supplied by the caller.
//!
//! A turn may be an object (`{"role": "human", "content": "..."}`), a
//! `["human", "..."]` pair, or a bare string, which is a human turn. A null
//! or missing `content` is read as an empty string.

use ragchat_model::Message;
use serde::{Deserialize, Deserializer, Serialize};

/// The speaker of a past turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "user")]
    Human,
    #[serde(alias = "ai")]
    Assistant,
    #[serde(alias = "developer")]
    System,
}

/// One past exchange in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChatTurnRepr")]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatTurnRepr {
    Text(String),
    Pair(Role, #[serde(deserialize_with = "null_as_empty")] String),
    Object {
        #[serde(alias = "type")]
        role: Role,
        #[serde(default, alias = "text", deserialize_with = "null_as_empty")]
        content: String,
    },
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<ChatTurnRepr> for ChatTurn {
    fn from(repr: ChatTurnRepr) -> Self {
        match repr {
            ChatTurnRepr::Text(content) => Self { role: Role::Human, content },
            ChatTurnRepr::Pair(role, content) | ChatTurnRepr::Object { role, content } => {
                Self { role, content }
            }
        }
    }
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// The model-level message for this turn.
    pub fn to_message(&self) -> Message {
        match self.role {
            Role::Human => Message::user(&self.content),
            Role::Assistant => Message::assistant(&self.content),
            Role::System => Message::system(&self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_object_and_pair_forms() {
        let turns: Vec<ChatTurn> = serde_json::from_value(json!([
            {"role": "human", "content": "What is acne?"},
            ["ai", "A skin condition."],
            {"type": "user", "text": "Is it common?"},
            ["assistant", "Very."]
        ]))
        .unwrap();

        assert_eq!(
            turns,
            vec![
                ChatTurn::human("What is acne?"),
                ChatTurn::assistant("A skin condition."),
                ChatTurn::human("Is it common?"),
                ChatTurn::assistant("Very."),
            ]
        );
    }

    #[test]
    fn accepts_bare_strings_system_turns_and_null_content() {
        let turns: Vec<ChatTurn> = serde_json::from_value(json!([
            ["system", "You are terse."],
            {"role": "developer", "content": "Cite nothing."},
            "What is Acne?",
            {"role": "ai", "content": null},
            {"role": "assistant"},
            ["ai", null]
        ]))
        .unwrap();

        assert_eq!(
            turns,
            vec![
                ChatTurn::new(Role::System, "You are terse."),
                ChatTurn::new(Role::System, "Cite nothing."),
                ChatTurn::human("What is Acne?"),
                ChatTurn::assistant(""),
                ChatTurn::assistant(""),
                ChatTurn::assistant(""),
            ]
        );
    }

    #[test]
    fn serializes_as_object() {
        let value = serde_json::to_value(ChatTurn::assistant("ok")).unwrap();
        assert_eq!(value, json!({"role": "assistant", "content": "ok"}));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let turn = json!({"role": "tool", "content": "x"});
        assert!(serde_json::from_value::<ChatTurn>(turn).is_err());
    }

    #[test]
    fn converts_to_model_roles() {
        use ragchat_model::MessageRole;
        assert_eq!(ChatTurn::human("q").to_message().role, MessageRole::User);
        assert_eq!(ChatTurn::assistant("a").to_message().role, MessageRole::Assistant);
        assert_eq!(
            ChatTurn::new(Role::System, "s").to_message(),
            ragchat_model::Message::system("s")
        );
    }
}
