//! HTTP application wiring (axum router).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use vastra_auth::TokenAuthority;

use crate::directory::AccountDirectory;
use crate::middleware::{self, AuthState};

pub mod errors;
pub mod routes;

/// Build the full router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Collaborators are injected: the token authority carries the signing
/// secret, the directory resolves token subjects to accounts.
pub fn build_app(authority: Arc<TokenAuthority>, accounts: Arc<dyn AccountDirectory>) -> Router {
    let auth_state = AuthState {
        authority,
        accounts: accounts.clone(),
    };

    // Protected routes: everything behind the auth middleware.
    let protected = Router::new()
        .nest("/auth", routes::session::router())
        .nest("/admin", routes::admin::router())
        .layer(Extension(accounts))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
