//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors surfaced to direct HTTP callers.
///
/// Routing misses on the delivery path never go through here -- they are
/// soft-ignored with a 2xx so the platform does not disable the webhook
/// subscription.
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid request parameters.
    BadRequest(String),
    /// Verification-token or signature failure.
    Forbidden(String),
    /// Tenant unresolved on a path where the caller expects an answer.
    NotFound(String),
    /// Outbound send failed; detail comes from the provider.
    SendFailed(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::SendFailed(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(json!({"detail": message}))).into_response()
    }
}
