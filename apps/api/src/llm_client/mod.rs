//! LLM Client — the single point of entry for text-generation calls in SayBetter.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Callers depend on the `TextGenerator` trait so the rewrite flow can be
//! exercised without network access.
//!
//! No retries: an upstream failure is returned to the caller as-is.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// Model used when a request does not name one.
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("Unexpected response format")]
    UnexpectedFormat,
}

/// A hosted text-in/text-out generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Every field optional: the body may be a success payload, an error envelope,
/// or something else entirely.
#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    error: Option<ApiErrorBody>,
    candidates: Option<Vec<Candidate>>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<Value>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First candidate's first part, else the top-level `text` field.
    fn into_text(self) -> Option<String> {
        let candidate_text = self
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.is_empty());

        candidate_text.or(self.text.filter(|t| !t.is_empty()))
    }
}

/// Maps an upstream error envelope onto the error taxonomy.
fn classify_api_error(body: ApiErrorBody, status: StatusCode) -> LlmError {
    let message = body.message.unwrap_or_else(|| "Unknown error".to_string());
    let code = match body.code {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s,
        _ => status.as_u16().to_string(),
    };

    if code == "400" && message.contains("API_KEY_INVALID") {
        return LlmError::InvalidCredential(message);
    }
    if code == "403" || message.to_lowercase().contains("permission") {
        return LlmError::PermissionDenied(message);
    }
    LlmError::Api { code, message }
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn with_options(
        api_key: Option<String>,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        // Key goes in a header so it never appears in a URL or a transport error.
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.without_url()))?;

        let parsed: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if status.is_success() => {
                warn!("Gemini returned a non-JSON success body");
                return Err(LlmError::UnexpectedFormat);
            }
            Err(_) => {
                warn!("Gemini API returned {status} with a non-JSON body");
                return Err(LlmError::Api {
                    code: status.as_u16().to_string(),
                    message: body,
                });
            }
        };

        if let Some(error) = parsed.error {
            let err = classify_api_error(error, status);
            warn!("Gemini API error: {err}");
            return Err(err);
        }

        match parsed.into_text() {
            Some(text) => {
                debug!("Gemini call succeeded: model={model}, reply_chars={}", text.len());
                Ok(text)
            }
            None => {
                warn!("Unexpected Gemini response format (status {status})");
                Err(LlmError::UnexpectedFormat)
            }
        }
    }
}
