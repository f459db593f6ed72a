//! Prompt templates.
//!
//! The wording here shapes model behavior, so it lives in named constants
//! and the tests pin it exactly.

use ragchat_model::Message;

use crate::history::ChatTurn;

/// System instruction for rewriting a follow-up into a standalone question.
///
/// Line breaks and the trailing space before each one are part of the text.
pub const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "\
Given a Chat History and the Latest User Question \n\
Which Might Reference Context in the Chat History, Formulate a Standalone Question \n\
Which can be Understood without the Chat History. Do NOT Answer the Question, \n\
just Reformulate it if Needed and Otherwise Return it as is.";

/// Placeholder replaced by the formatted passages in [`QA_SYSTEM_PROMPT`].
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// System instruction for the final answer. Ends with [`CONTEXT_PLACEHOLDER`].
pub const QA_SYSTEM_PROMPT: &str = "\
You are a Medical Assistant for Question-Answering Tasks. \n\
Use the Following Pieces of Retrieved Context to Answer the Question. \n\
If you Don't Know the Answer, Just Say that you Don't Know. \n\
Use Three Sentences Maximum and Keep the Answer Concise.\n\n{context}";

/// Fill the answer instruction with the retrieved context.
pub fn render_qa_system_prompt(context: &str) -> String {
    QA_SYSTEM_PROMPT.replacen(CONTEXT_PLACEHOLDER, context, 1)
}

/// `[system] + history + [user: question]`, the shape both prompts share.
pub fn build_chat_prompt(system: String, history: &[ChatTurn], question: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system));
    messages.extend(history.iter().map(ChatTurn::to_message));
    messages.push(Message::user(question));
    messages
}
