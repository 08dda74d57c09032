use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::history::HistoryEntry;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Case-insensitive filter on the original input text.
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/v1/history
pub async fn handle_list_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let Query(params) = query?;
    let entries = match params.q.as_deref() {
        Some(q) => state.history.search(q).await?,
        None => state.history.list_recent().await?,
    };
    Ok(Json(entries))
}

/// GET /api/v1/history/:id
pub async fn handle_get_history_entry(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<HistoryEntry>, AppError> {
    let Path(id) = path?;
    let entry = state
        .history
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("History entry {id} not found")))?;
    Ok(Json(entry))
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
