//! Gateway request protocol.
//!
//! The assistant core talks to the hosted model through one narrow seam:
//! a [`ChatRequest`] goes out, generated text (or a [`GatewayError`]) comes
//! back. Everything provider-specific stays behind the [`TextGenerator`]
//! trait, so tests script the seam with an in-memory implementation.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayResult;

/// Who produced a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of the conversation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        ChatTurn { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatTurn { role: Role::Assistant, content: content.into() }
    }
}

/// The grounding payload for one model call.
///
/// The full catalog rides along as serialized JSON on every call. That is
/// acceptable for small catalogs and is a known scalability ceiling; see
/// DESIGN.md.
#[derive(Clone, Debug)]
pub struct ChatRequest {
    /// Natural-language catalog summary from the context builder.
    pub context: String,
    /// The whole catalog serialized as JSON text.
    pub catalog_json: String,
    /// The most recent conversation turns, oldest first.
    pub history: Vec<ChatTurn>,
    /// The new user query.
    pub query: String,
}

impl ChatRequest {
    /// Render the history window and query as one prompt block.
    pub fn transcript(&self) -> String {
        let mut transcript = String::from("History:\n");
        for turn in &self.history {
            transcript.push_str(&format!("{}: {}\n", turn.role, turn.content));
        }
        transcript.push_str(&format!("Query: {}", self.query));
        transcript
    }
}

/// The text-generation seam.
///
/// The hosted-model client implements this over HTTP; tests implement it
/// with scripted responses.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a response for one grounded request.
    async fn generate(&self, request: &ChatRequest) -> GatewayResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_renders_roles_and_query() {
        let request = ChatRequest {
            context: String::new(),
            catalog_json: String::new(),
            history: vec![
                ChatTurn::user("any laptops in stock?"),
                ChatTurn::assistant("Yes, two models."),
            ],
            query: "which is cheaper?".to_string(),
        };
        let transcript = request.transcript();
        assert!(transcript.starts_with("History:\n"));
        assert!(transcript.contains("user: any laptops in stock?"));
        assert!(transcript.contains("assistant: Yes, two models."));
        assert!(transcript.ends_with("Query: which is cheaper?"));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let turn = ChatTurn::user("hi");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
