//! Axum route handlers for the Rewrite API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::rewrite::service::{rewrite, RewriteOutcome, RewriteRequest};
use crate::rewrite::tone::{tone_descriptors, ToneDescriptor};
use crate::state::AppState;

/// POST /api/v1/rewrite
///
/// Rewrites mixed-language text into four English variants with the requested tone.
/// Non-empty results are saved to history; `history_id` is null otherwise.
pub async fn handle_rewrite(
    State(state): State<AppState>,
    payload: Result<Json<RewriteRequest>, JsonRejection>,
) -> Result<Json<RewriteOutcome>, AppError> {
    let Json(request) = payload?;
    let outcome = rewrite(
        state.generator.as_ref(),
        state.history.as_ref(),
        request,
        &state.config.default_model,
    )
    .await?;

    Ok(Json(outcome))
}

/// GET /api/v1/tones
pub async fn handle_list_tones() -> Json<Vec<ToneDescriptor>> {
    Json(tone_descriptors())
}
