//! API wire helpers shared across handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

pub const WELCOME_MESSAGE: &str = "Welcome to the Content Aggregator API";

/// `{"error": ...}` body with the given status.
pub fn error_body(status: StatusCode, message: impl AsRef<str>) -> Response {
    (status, Json(json!({ "error": message.as_ref() }))).into_response()
}

/// 400 for a missing required request field.
pub fn missing_field(message: &str) -> Response {
    error_body(StatusCode::BAD_REQUEST, message)
}
