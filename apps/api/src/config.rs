use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Settings for the transactional mail API used by the contact form.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub support_email: String,
}

/// Application configuration loaded from environment variables.
///
/// Nothing is required at startup: a missing `GEMINI_API_KEY` is reported on
/// each rewrite request, and a missing mail setting disables the contact relay.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub default_model: String,
    pub llm_timeout_secs: u64,
    pub database_url: String,
    pub mail: Option<MailConfig>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            default_model: optional_env("DEFAULT_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "60".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            database_url: optional_env("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://saybetter.db".to_string()),
            mail: mail_from_env(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// All three mail variables must be set for the relay to be enabled.
fn mail_from_env() -> Option<MailConfig> {
    Some(MailConfig {
        api_url: optional_env("MAIL_API_URL")?,
        api_key: optional_env("MAIL_API_KEY")?,
        support_email: optional_env("SUPPORT_EMAIL")?,
    })
}

/// Reads a variable, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
