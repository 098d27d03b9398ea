//! Assistant gateway — the boundary between the catalog and the hosted model.
//!
//! The model is an opaque collaborator: this crate owns the narrow
//! request/response contract and everything that sits in front of it.
//!
//! - Every outbound call carries a [`ChatRequest`]: grounding context,
//!   serialized catalog, recent turns, new query.
//! - Every failure mode is a named [`GatewayError`] variant, and none of
//!   them reaches the user as an error: the session converts failures to
//!   an inline, error-prefixed assistant turn.
//! - Session state is an explicit object, created once per user session
//!   and passed to each handler. No ambient globals.

pub mod client;
pub mod error;
pub mod protocol;
pub mod session;

pub use client::{ClientConfig, HostedModelClient};
pub use error::{GatewayError, GatewayResult};
pub use protocol::{ChatRequest, ChatTurn, Role, TextGenerator};
pub use session::{ChatSession, HISTORY_WINDOW};
