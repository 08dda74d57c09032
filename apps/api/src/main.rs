mod config;
mod contact;
mod db;
mod errors;
mod history;
mod llm_client;
mod models;
mod rewrite;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::contact::{HttpMailer, Mailer};
use crate::db::create_pool;
use crate::history::SqliteHistoryStore;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("saybetter_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SayBetter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite history
    let db = create_pool(&config.database_url).await?;
    let history = Arc::new(SqliteHistoryStore::new(db));

    // Initialize Gemini client
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; rewrite requests will fail until it is configured");
    }
    let generator = Arc::new(GeminiClient::with_options(
        config.gemini_api_key.clone(),
        &config.gemini_api_base,
        config.llm_timeout_secs,
    )?);
    info!("Gemini client initialized (default model: {})", config.default_model);

    // Contact relay is optional
    let mailer = match config.mail.clone() {
        Some(mail) => Some(Arc::new(HttpMailer::new(mail)) as Arc<dyn Mailer>),
        None => {
            warn!("MAIL_API_URL / MAIL_API_KEY / SUPPORT_EMAIL not set; contact form disabled");
            None
        }
    };

    let state = AppState {
        generator,
        history,
        mailer,
        config: config.clone(),
    };

    // Permissive CORS: the browser front-end is served from a different origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
