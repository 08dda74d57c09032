use std::sync::Arc;

use crate::config::Config;
use crate::contact::Mailer;
use crate::history::HistoryStore;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text generation backend. Default: GeminiClient.
    pub generator: Arc<dyn TextGenerator>,
    /// Rewrite history. Default: SqliteHistoryStore.
    pub history: Arc<dyn HistoryStore>,
    /// Contact relay; `None` when mail settings are absent.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub config: Config,
}
