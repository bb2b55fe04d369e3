//! Google Generative Language (Gemini) client.
//!
//! Calls `models/{model}:generateContent` once per request; there is no
//! retry. The [`ModelClient`] trait is the seam the chat relay depends on.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::chat::ConversationTurn;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Message used when a failed upstream response carries no error detail.
const GENERIC_FAILURE: &str = "API call failed";

/// Errors from the upstream model call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed upstream payload: {0}")]
    Malformed(String),
}

/// A generative model that answers a conversation under a system instruction.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Return the raw text of the model's reply.
    async fn generate(
        &self,
        system_instruction: &str,
        contents: &[ConversationTurn],
    ) -> Result<String, UpstreamError>;
}

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Settings for the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: &'a [ConversationTurn],
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Upstream error message from a failure body, or a generic one.
fn failure_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Text of the first part of the first candidate.
fn first_text(body: &str) -> Result<String, UpstreamError> {
    let resp: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::Malformed(format!("response parse error: {e}")))?;
    resp.candidates
        .into_iter()
        .next()
        .ok_or_else(|| UpstreamError::Malformed("no candidates".into()))?
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| UpstreamError::Malformed("candidate has no text part".into()))
}

/// reqwest-backed Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(
        &self,
        system_instruction: &str,
        contents: &[ConversationTurn],
    ) -> Result<String, UpstreamError> {
        debug!(model = %self.config.model, turns = contents.len(), "calling generateContent");

        let resp = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&GenerateContentRequest {
                system_instruction: SystemInstruction {
                    parts: [TextPart {
                        text: system_instruction,
                    }],
                },
                contents,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: failure_message(&body),
            });
        }

        first_text(&body)
    }
}
