use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::contact::{ContactError, ContactRequest};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/contact
///
/// Validation runs before the relay configuration is checked, so a bad form
/// is always reported as such.
pub async fn handle_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let contact = request.validate()?;
    let mailer = state.mailer.as_ref().ok_or(ContactError::NotConfigured)?;

    mailer.send(&contact).await?;

    Ok(Json(json!({ "success": true })))
}
