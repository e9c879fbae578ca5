//! Role/permission guard middleware.
//!
//! Guards assume [`crate::middleware::auth_middleware`] already ran and left
//! an [`AuthContext`] in the request extensions; a missing context is treated
//! as "not authenticated" rather than a panic.

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use vastra_auth::{authorize_permission, authorize_role, Permission, Role};

use crate::app::errors::{json_error, NOT_AUTHENTICATED};
use crate::context::AuthContext;

type GuardFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Middleware that admits only requests whose claims grant `permission`.
///
/// Use with `axum::middleware::from_fn`.
pub fn require_permission(
    permission: Permission,
) -> impl Fn(Request, Next) -> GuardFuture + Clone + Send + 'static {
    move |req: Request, next: Next| {
        let permission = permission.clone();
        Box::pin(async move {
            let Some(ctx) = req.extensions().get::<AuthContext>() else {
                return json_error(StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED);
            };

            match authorize_permission(ctx.claims(), &permission) {
                Ok(()) => next.run(req).await,
                Err(err) => json_error(StatusCode::FORBIDDEN, err.to_string()),
            }
        })
    }
}

/// Middleware that admits only requests whose claims carry one of the
/// `accepted` roles. The 403 body names every acceptable role.
pub fn require_role(
    accepted: Vec<Role>,
) -> impl Fn(Request, Next) -> GuardFuture + Clone + Send + 'static {
    move |req: Request, next: Next| {
        let accepted = accepted.clone();
        Box::pin(async move {
            let Some(ctx) = req.extensions().get::<AuthContext>() else {
                return json_error(StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED);
            };

            match authorize_role(ctx.claims(), &accepted) {
                Ok(()) => next.run(req).await,
                Err(err) => json_error(StatusCode::FORBIDDEN, err.to_string()),
            }
        })
    }
}
