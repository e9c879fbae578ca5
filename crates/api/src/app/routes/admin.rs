//! Staff-only routes.
//!
//! The whole router is gated on role, individual routes additionally on the
//! fine-grained permission they need.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use vastra_auth::{Permission, Role, SubjectId};

use crate::app::errors::json_error;
use crate::directory::AccountDirectory;
use crate::guards::{require_permission, require_role};

pub fn router() -> Router {
    Router::new()
        .route(
            "/accounts/:id",
            get(lookup_account).route_layer(axum::middleware::from_fn(require_permission(
                Permission::new("user:read"),
            ))),
        )
        .route_layer(axum::middleware::from_fn(require_role(vec![
            Role::new("admin"),
            Role::new("contentManager"),
        ])))
}

pub async fn lookup_account(
    Extension(accounts): Extension<Arc<dyn AccountDirectory>>,
    Path(id): Path<i64>,
) -> Response {
    match accounts.find(SubjectId::new(id)).await {
        Ok(Some(account)) => Json(account).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Account not found"),
        Err(err) => {
            tracing::error!(subject = id, error = %err, "admin account lookup failed");
            json_error(StatusCode::BAD_GATEWAY, "Account service unavailable")
        }
    }
}
