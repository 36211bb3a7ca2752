//! Conversation turns and few-shot examples.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageAuthor {
    /// The human side of the conversation.
    #[serde(rename = "user")]
    User,
    /// The model side of the conversation.
    #[serde(rename = "bot")]
    Model,
}

impl MessageAuthor {
    /// The author string used on the wire.
    pub const fn as_wire_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "bot",
        }
    }
}

/// One message in a conversation.
///
/// Turns are immutable once created; a session's history is an append-only
/// sequence of them in wall-clock order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Content of the message.
    pub content: String,
    /// Author of the message.
    pub author: MessageAuthor,
}

impl ChatMessage {
    /// A user-authored turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: MessageAuthor::User,
        }
    }

    /// A model-authored turn.
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: MessageAuthor::Model,
        }
    }
}

/// A pair of input and output texts used as a few-shot example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOutputTextPair {
    /// Example input text.
    pub input_text: String,
    /// Expected output text for the input.
    pub output_text: String,
}

impl InputOutputTextPair {
    /// Create an example pair.
    pub fn new(input_text: impl Into<String>, output_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            output_text: output_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authors_serialize_to_wire_strings() {
        assert_eq!(
            serde_json::to_value(MessageAuthor::User).unwrap(),
            serde_json::json!("user")
        );
        assert_eq!(
            serde_json::to_value(MessageAuthor::Model).unwrap(),
            serde_json::json!("bot")
        );
    }

    #[test]
    fn constructors_set_the_author() {
        assert_eq!(ChatMessage::user("hi").author, MessageAuthor::User);
        assert_eq!(ChatMessage::model("hello").author, MessageAuthor::Model);
    }
}
