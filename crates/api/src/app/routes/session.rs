//! Session introspection for authenticated callers.

use axum::{
    extract::Extension,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/validate", get(validate))
}

/// The account the session resolves to.
pub async fn me(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(ctx.account().clone())
}

/// Token health check used by the web and mobile clients on startup.
pub async fn validate(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "valid": true,
        "user": ctx.account(),
    }))
}
