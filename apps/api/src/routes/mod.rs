pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::contact::handlers as contact;
use crate::history::handlers as history;
use crate::rewrite::handlers as rewrite;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Rewrite API
        .route("/api/v1/tones", get(rewrite::handle_list_tones))
        .route("/api/v1/rewrite", post(rewrite::handle_rewrite))
        // History API
        .route(
            "/api/v1/history",
            get(history::handle_list_history).delete(history::handle_clear_history),
        )
        .route("/api/v1/history/:id", get(history::handle_get_history_entry))
        // Contact form
        .route("/api/v1/contact", post(contact::handle_contact))
        .with_state(state)
}
