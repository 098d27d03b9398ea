//! Chat session state.
//!
//! One [`ChatSession`] per user session, created explicitly and threaded
//! through every handler call. It owns the catalog snapshot, the grounding
//! context derived from it, the conversation history, and the admin flag.
//! There is no ambient global state anywhere in the workspace.

use chrono::{DateTime, Utc};

use assistant_catalog::{build_context, Catalog};

use crate::protocol::{ChatRequest, ChatTurn, TextGenerator};

/// How many recent turns ride along with each model call.
pub const HISTORY_WINDOW: usize = 3;

/// Prefix marking an inline gateway failure in the conversation.
const GATEWAY_ERROR_PREFIX: &str = "\u{26a0}\u{fe0f} Error";

/// Per-user conversation state.
pub struct ChatSession {
    catalog: Catalog,
    context: String,
    catalog_json: String,
    history: Vec<ChatTurn>,
    is_admin: bool,
}

impl ChatSession {
    /// Build a session around one catalog snapshot.
    ///
    /// The context and catalog serialization are derived once here; the
    /// catalog is not reloaded for the lifetime of the session.
    pub fn new(catalog: Catalog, now: DateTime<Utc>) -> Self {
        let context = build_context(&catalog, now);
        let catalog_json = catalog.to_json();
        ChatSession {
            catalog,
            context,
            catalog_json,
            history: Vec::new(),
            is_admin: false,
        }
    }

    /// The catalog snapshot this session answers from. The dashboard path
    /// rebuilds its normalized table from this on every display.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Run one assistant turn.
    ///
    /// The user turn is recorded first, then the model is called with the
    /// last [`HISTORY_WINDOW`] turns. A gateway failure of any kind becomes
    /// the inline error string, which is recorded as a normal assistant
    /// turn so the conversation never loses a beat.
    pub async fn respond(&mut self, generator: &dyn TextGenerator, query: &str) -> String {
        self.history.push(ChatTurn::user(query));

        let window_start = self.history.len().saturating_sub(HISTORY_WINDOW);
        let request = ChatRequest {
            context: self.context.clone(),
            catalog_json: self.catalog_json.clone(),
            history: self.history[window_start..].to_vec(),
            query: query.to_string(),
        };

        let reply = match generator.generate(&request).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("gateway call failed: {}", e);
                format!("{}: {}", GATEWAY_ERROR_PREFIX, e)
            }
        };

        self.history.push(ChatTurn::assistant(reply.clone()));
        reply
    }

    /// Check a shared-secret attempt and set the session admin flag.
    ///
    /// An unconfigured or empty secret never matches. The flag is
    /// overwritten on every attempt, so a failed retry revokes a previous
    /// success.
    pub fn verify_admin(&mut self, attempt: &str, secret: Option<&str>) -> bool {
        self.is_admin = matches!(secret, Some(secret) if !secret.is_empty() && attempt == secret);
        self.is_admin
    }
}
