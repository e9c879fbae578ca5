//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

// Rejection messages mirrored by clients; changing them is a breaking change.
pub const NO_TOKEN: &str = "No authentication token provided";
pub const INVALID_TOKEN: &str = "Invalid or expired token";
pub const NOT_ACTIVE: &str = "User not found or inactive";
pub const AUTH_ERROR: &str = "Authentication error";
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Structured rejection body: `{"error": "<message>"}`.
///
/// Internal details (directory errors, token parse failures) are logged at
/// the call site, never leaked into the body.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}
