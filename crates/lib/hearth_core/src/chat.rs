//! Chat conversation models shared by the relay and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn, in the upstream model's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A text fragment of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One turn of caller-supplied history. Forwarded to the model untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl ConversationTurn {
    /// A single-part user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// A single-part model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Incoming chat request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// When non-empty this is sent as the whole conversation and must already
    /// end with the new user message; `message` is then only used to pick a
    /// fallback reply.
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_history: Vec::new(),
        }
    }
}

/// Final reply text after sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn history_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_value(json!({"message": "hi"})).unwrap();
        assert_eq!(req, ChatRequest::new("hi"));
    }

    #[test]
    fn turns_use_lowercase_roles() {
        let req: ChatRequest = serde_json::from_value(json!({
            "message": "",
            "conversationHistory": [
                {"role": "user", "parts": [{"text": "lights on"}]},
                {"role": "model", "parts": [{"text": "Done!"}]}
            ]
        }))
        .unwrap();
        assert_eq!(
            req.conversation_history,
            vec![
                ConversationTurn::user("lights on"),
                ConversationTurn::model("Done!")
            ]
        );
        assert_eq!(
            serde_json::to_value(&req.conversation_history[1]).unwrap(),
            json!({"role": "model", "parts": [{"text": "Done!"}]})
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        let res = serde_json::from_value::<ConversationTurn>(
            json!({"role": "system", "parts": [{"text": "x"}]}),
        );
        assert!(res.is_err());
    }
}
