use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Body of a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// The model that will complete the conversation.
    pub model: String,

    /// The conversation so far, oldest first.
    pub messages: Vec<Message>,

    /// Whether to deliver the reply incrementally as server-sent events.
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Create a streaming request for the given model and conversation.
    pub fn streaming(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: true,
        }
    }
}
