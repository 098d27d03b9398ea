//! Hosted model client.
//!
//! Implements [`TextGenerator`] over the generate-content REST API of the
//! hosted model. One POST per call, no streaming, no retries: a failed
//! call surfaces as a [`GatewayError`] and the session layer renders the
//! inline fallback instead.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{ChatRequest, TextGenerator};
use async_trait::async_trait;

/// Default API endpoint for the hosted model.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model identifier.
const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

/// Connection settings for the hosted model.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API key. Absent means every call fails with `MissingApiKey`, which
    /// the session renders as the inline error fallback.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// HTTP client for the hosted model API.
pub struct HostedModelClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HostedModelClient {
    pub fn new(config: ClientConfig) -> Self {
        HostedModelClient {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the request body: the grounding context, the serialized
    /// catalog, and the transcript ride as parts of a single user content.
    fn build_body(&self, request: &ChatRequest) -> GenerateContentBody {
        GenerateContentBody {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part { text: request.context.clone() },
                    Part { text: request.catalog_json.clone() },
                    Part { text: request.transcript() },
                ],
            }],
        }
    }
}

#[async_trait]
impl TextGenerator for HostedModelClient {
    async fn generate(&self, request: &ChatRequest) -> GatewayResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingApiKey)?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.build_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: extract_api_error(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        extract_text(&parsed)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentBody {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Pull the human-readable message out of an API error body, falling back
/// to the raw body when it does not match the documented shape.
fn extract_api_error(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { error: Some(detail) }) if !detail.message.is_empty() => detail.message,
        _ => body.chars().take(200).collect(),
    }
}

/// Join the text parts of the first candidate.
fn extract_text(response: &GenerateContentResponse) -> GatewayResult<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or(GatewayError::EmptyResponse)?;
    let content = candidate
        .content
        .as_ref()
        .ok_or(GatewayError::EmptyResponse)?;

    let text: String = content
        .parts
        .iter()
        .map(|part| part.text.as_str())
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        Err(GatewayError::EmptyResponse)
    } else {
        Ok(text)
    }
}
