use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::contact::ContactError;
use crate::rewrite::service::RewriteError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Rewrite(err) => {
                let (status, code) = match err {
                    RewriteError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    RewriteError::Configuration(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
                    }
                    RewriteError::UpstreamAuth(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_AUTH_ERROR"),
                    RewriteError::UpstreamPermission(_) => {
                        (StatusCode::BAD_GATEWAY, "UPSTREAM_PERMISSION_ERROR")
                    }
                    RewriteError::UpstreamGeneric { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
                    RewriteError::UnexpectedFormat => (StatusCode::BAD_GATEWAY, "UNEXPECTED_FORMAT"),
                    RewriteError::Transport(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
                };
                (status, code, err.user_message())
            }
            AppError::Contact(err) => match err {
                ContactError::MissingFields => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Missing required fields".to_string(),
                ),
                ContactError::NotConfigured => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "Server configuration error".to_string(),
                ),
                ContactError::Relay(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MAIL_ERROR",
                    "Failed to send email".to_string(),
                ),
            },
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
            ),
        }
    }
}

// Extractor rejections get the same JSON envelope as every other error.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!("{code}: {self:?}");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
