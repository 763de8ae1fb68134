use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type Result<T> = core::result::Result<T, ApiError>;

/// Request-level failure taxonomy. Every variant maps to a stable
/// machine-readable `error` field; webhook callers are automated systems,
/// so the bodies favor stable strings over prose.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required secret/credential is absent. Fatal for the request.
    /// The variable name is logged, never its value.
    #[error("server configuration missing: {0}")]
    MissingConfig(&'static str),

    #[error("signature header missing")]
    MissingSignature,

    #[error("signature verification failed")]
    InvalidSignature,

    /// Per-field validation messages, surfaced to the caller.
    #[error("validation failed")]
    Validation(Vec<String>),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(&'static str),

    /// A required downstream dispatch (e.g. email) failed. Best-effort
    /// channels never produce this; they are logged and swallowed.
    #[error("downstream dispatch failed: {0}")]
    DispatchFailed(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::MissingConfig(var) => {
                error!(variable = var, "missing server configuration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Server misconfigured", "message": "required configuration absent" }),
                )
            }
            ApiError::MissingSignature => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing signature" }),
            ),
            ApiError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid signature" }),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "errors": errors }),
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Bad request", "message": message }),
            ),
            ApiError::NotFound(what) => {
                (StatusCode::NOT_FOUND, json!({ "error": "Not found", "message": what }))
            }
            ApiError::DispatchFailed(channel) => {
                error!(channel, "required downstream dispatch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Dispatch failed", "message": channel }),
                )
            }
            ApiError::Internal(err) => {
                error!(error = %err, "unexpected processing error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal error", "message": "unexpected processing error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
