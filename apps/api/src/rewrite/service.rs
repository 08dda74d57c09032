//! Rewrite flow: prompt → text generation → reply parsing → history.
//!
//! Strictly sequential per request. Upstream failures are mapped onto
//! `RewriteError` and returned; nothing here retries.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::history::HistoryStore;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::history::NewHistoryEntry;
use crate::rewrite::prompts::build_prompt;
use crate::rewrite::reply_parser::{parse_reply, RewriteResult};
use crate::rewrite::tone::Tone;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream rejected the API key: {0}")]
    UpstreamAuth(String),

    #[error("Upstream permission denied: {0}")]
    UpstreamPermission(String),

    #[error("Upstream error ({code}): {message}")]
    UpstreamGeneric { code: String, message: String },

    #[error("Upstream returned an unexpected response format")]
    UnexpectedFormat,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl RewriteError {
    /// Message suitable for showing to the person who submitted the text.
    pub fn user_message(&self) -> String {
        match self {
            RewriteError::Validation(msg) => msg.clone(),
            RewriteError::Configuration(_) => {
                "Server error: GEMINI_API_KEY is not set in environment.".to_string()
            }
            RewriteError::UpstreamAuth(_) => "Invalid GEMINI_API_KEY. Please check the server \
                configuration and make sure the API key is correct."
                .to_string(),
            RewriteError::UpstreamPermission(_) => "API key does not have permission. \
                Check your Google Cloud project settings."
                .to_string(),
            RewriteError::UpstreamGeneric { code, message } => {
                format!("Gemini API Error ({code}): {message}")
            }
            RewriteError::UnexpectedFormat => {
                "Gemini error: unexpected response format. Check server logs for details."
                    .to_string()
            }
            RewriteError::Transport(_) => "Internal server error calling Gemini API.".to_string(),
        }
    }
}

impl From<LlmError> for RewriteError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => {
                RewriteError::Configuration("GEMINI_API_KEY is not configured".to_string())
            }
            LlmError::InvalidCredential(msg) => RewriteError::UpstreamAuth(msg),
            LlmError::PermissionDenied(msg) => RewriteError::UpstreamPermission(msg),
            LlmError::Api { code, message } => RewriteError::UpstreamGeneric { code, message },
            LlmError::UnexpectedFormat => RewriteError::UnexpectedFormat,
            LlmError::Transport(e) => RewriteError::Transport(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
    pub text: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewriteOutcome {
    pub result: RewriteResult,
    pub tone: Tone,
    pub model: String,
    /// Set when the result was saved to history.
    pub history_id: Option<i64>,
}

/// Model ids are spliced into the request path, so only plain identifiers pass.
fn resolve_model(requested: Option<&str>, default_model: &str) -> Result<String, RewriteError> {
    let model = match requested.map(str::trim) {
        Some(m) if !m.is_empty() => m,
        _ => default_model,
    };

    let valid = model
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(RewriteError::Validation(format!("Unsupported model id '{model}'")));
    }
    Ok(model.to_string())
}

/// Runs one rewrite end to end.
///
/// The entry is saved only when at least one section came back non-empty.
/// A failed save is logged and the result is still returned.
pub async fn rewrite(
    generator: &dyn TextGenerator,
    history: &dyn HistoryStore,
    request: RewriteRequest,
    default_model: &str,
) -> Result<RewriteOutcome, RewriteError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(RewriteError::Validation("text cannot be empty".to_string()));
    }

    let tone = Tone::resolve_opt(request.tone.as_deref());
    let model = resolve_model(request.model.as_deref(), default_model)?;

    let prompt = build_prompt(text, tone);
    let reply = generator.generate(&prompt, &model).await.map_err(|e| {
        warn!("Text generation failed: {e}");
        RewriteError::from(e)
    })?;

    let result = parse_reply(&reply);
    debug!(
        "Parsed reply: corrected={} professional={} casual={} genz={}",
        result.corrected.len(),
        result.professional.len(),
        result.casual.len(),
        result.genz.len()
    );

    let history_id = persist_if_nonempty(history, text, tone, &result).await;

    Ok(RewriteOutcome {
        result,
        tone,
        model,
        history_id,
    })
}

async fn persist_if_nonempty(
    history: &dyn HistoryStore,
    input_text: &str,
    tone: Tone,
    result: &RewriteResult,
) -> Option<i64> {
    if result.is_empty() {
        info!("Reply had no recognizable sections; not saving to history");
        return None;
    }

    let entry = NewHistoryEntry {
        input_text: input_text.to_string(),
        tone: tone.name().to_string(),
        result: result.clone(),
        created_at: Utc::now(),
    };

    match history.append(entry).await {
        Ok(id) => Some(id),
        Err(e) => {
            error!("Failed to save history entry: {e:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::db::create_pool;
    use crate::history::SqliteHistoryStore;
    use crate::llm_client::DEFAULT_MODEL;
    use crate::models::history::HistoryEntry;

    /// Returns a canned reply and records what it was asked.
    struct FakeGenerator {
        reply: Result<String, fn() -> LlmError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(make: fn() -> LlmError) -> Self {
            Self {
                reply: Err(make),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), model.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl HistoryStore for BrokenStore {
        async fn append(&self, _entry: NewHistoryEntry) -> anyhow::Result<i64> {
            anyhow::bail!("disk full")
        }
        async fn list_recent(&self) -> anyhow::Result<Vec<HistoryEntry>> {
            Ok(vec![])
        }
        async fn get(&self, _id: i64) -> anyhow::Result<Option<HistoryEntry>> {
            Ok(None)
        }
        async fn clear_all(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    const FULL_REPLY: &str =
        "Corrected: I am going home.\nProfessional: I am heading home now.\nCasual: Off home.\nGen-Z: homebound fr";

    async fn store() -> SqliteHistoryStore {
        SqliteHistoryStore::new(create_pool("sqlite::memory:").await.unwrap())
    }

    fn request(text: &str, tone: Option<&str>) -> RewriteRequest {
        RewriteRequest {
            text: text.to_string(),
            tone: tone.map(str::to_string),
            model: None,
        }
    }

    #[tokio::test]
    async fn test_successful_rewrite_is_parsed_and_saved() {
        let generator = FakeGenerator::replying(FULL_REPLY);
        let history = store().await;

        let outcome = rewrite(&generator, &history, request("  saya pulang  ", Some("warm")), DEFAULT_MODEL)
            .await
            .unwrap();

        assert_eq!(outcome.result.corrected, "I am going home.");
        assert_eq!(outcome.result.genz, "homebound fr");
        assert_eq!(outcome.tone, Tone::Warm);
        assert_eq!(outcome.model, DEFAULT_MODEL);

        let saved = history.list_recent().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(Some(saved[0].id), outcome.history_id);
        assert_eq!(saved[0].input_text, "saya pulang");
        assert_eq!(saved[0].tone, "Warm");
        assert_eq!(saved[0].result, outcome.result);
    }

    #[tokio::test]
    async fn test_prompt_carries_trimmed_text_and_tone() {
        let generator = FakeGenerator::replying(FULL_REPLY);
        let history = store().await;

        rewrite(&generator, &history, request(" halo dunia ", Some("Nonexistent")), DEFAULT_MODEL)
            .await
            .unwrap();

        let calls = generator.calls.lock().unwrap();
        let (prompt, model) = &calls[0];
        assert!(prompt.contains("halo dunia"));
        assert!(prompt.contains("Tone: Normal"));
        assert_eq!(model, DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_saved() {
        let generator = FakeGenerator::replying("I could not understand that.");
        let history = store().await;

        let outcome = rewrite(&generator, &history, request("???", None), DEFAULT_MODEL)
            .await
            .unwrap();

        assert!(outcome.result.is_empty());
        assert_eq!(outcome.history_id, None);
        assert!(history.list_recent().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_without_calling_upstream() {
        let generator = FakeGenerator::replying(FULL_REPLY);
        let history = store().await;

        let err = rewrite(&generator, &history, request(" \n\t ", None), DEFAULT_MODEL)
            .await
            .unwrap_err();

        assert!(matches!(err, RewriteError::Validation(_)));
        assert!(generator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_requested_model_is_used_and_validated() {
        let generator = FakeGenerator::replying(FULL_REPLY);
        let history = store().await;

        let mut req = request("hi", None);
        req.model = Some("gemini-2.0-flash".to_string());
        let outcome = rewrite(&generator, &history, req, DEFAULT_MODEL).await.unwrap();
        assert_eq!(outcome.model, "gemini-2.0-flash");

        let mut bad = request("hi", None);
        bad.model = Some("../../admin?x=1".to_string());
        let err = rewrite(&generator, &history, bad, DEFAULT_MODEL).await.unwrap_err();
        assert!(matches!(err, RewriteError::Validation(_)));
    }

    #[tokio::test]
    async fn test_upstream_errors_map_to_distinct_variants() {
        let history = store().await;
        let cases: [(fn() -> LlmError, fn(&RewriteError) -> bool); 5] = [
            (|| LlmError::MissingApiKey, |e| matches!(e, RewriteError::Configuration(_))),
            (
                || LlmError::InvalidCredential("API_KEY_INVALID".into()),
                |e| matches!(e, RewriteError::UpstreamAuth(_)),
            ),
            (
                || LlmError::PermissionDenied("nope".into()),
                |e| matches!(e, RewriteError::UpstreamPermission(_)),
            ),
            (
                || LlmError::Api {
                    code: "429".into(),
                    message: "Quota".into(),
                },
                |e| matches!(e, RewriteError::UpstreamGeneric { .. }),
            ),
            (|| LlmError::UnexpectedFormat, |e| matches!(e, RewriteError::UnexpectedFormat)),
        ];

        for (make, check) in cases {
            let generator = FakeGenerator::failing(make);
            let err = rewrite(&generator, &history, request("hi", None), DEFAULT_MODEL)
                .await
                .unwrap_err();
            assert!(check(&err), "unexpected mapping: {err:?}");
        }
        assert!(history.list_recent().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_failure_still_returns_result() {
        let generator = FakeGenerator::replying(FULL_REPLY);

        let outcome = rewrite(&generator, &BrokenStore, request("hi", None), DEFAULT_MODEL)
            .await
            .unwrap();

        assert_eq!(outcome.result.casual, "Off home.");
        assert_eq!(outcome.history_id, None);
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let messages = [
            RewriteError::Configuration(String::new()).user_message(),
            RewriteError::UpstreamAuth(String::new()).user_message(),
            RewriteError::UpstreamPermission(String::new()).user_message(),
            RewriteError::UpstreamGeneric {
                code: "500".into(),
                message: "boom".into(),
            }
            .user_message(),
            RewriteError::UnexpectedFormat.user_message(),
            RewriteError::Transport(String::new()).user_message(),
        ];
        let unique: std::collections::HashSet<_> = messages.iter().collect();
        assert_eq!(unique.len(), messages.len());
        assert_eq!(messages[3], "Gemini API Error (500): boom");
    }
}
