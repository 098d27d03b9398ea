//! Gateway error types.
//!
//! Every failure mode of the outbound model call has a named variant. None
//! of them propagates to the user as an error: the session layer converts
//! them into the inline fallback string and keeps the conversation going.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no API key configured for the hosted model")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("model returned no candidates")]
    EmptyResponse,
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
