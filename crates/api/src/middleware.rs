//! Authentication middleware: token extraction, verification, account
//! resolution, and sliding renewal.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use vastra_auth::{permissions_for_role, Claims, Identity, TokenAuthority};

use crate::app::errors::{json_error, AUTH_ERROR, INVALID_TOKEN, NOT_ACTIVE, NO_TOKEN};
use crate::context::AuthContext;
use crate::directory::{Account, AccountDirectory};

/// Cookie carrying the session token when no bearer header is present.
pub const TOKEN_COOKIE: &str = "jwt";

/// Re-issue the token once less than this much lifetime remains.
const RENEWAL_WINDOW_SECS: i64 = 900;

#[derive(Clone)]
pub struct AuthState {
    pub authority: Arc<TokenAuthority>,
    pub accounts: Arc<dyn AccountDirectory>,
}

/// Gate a request on a valid token and an active account.
///
/// Rejections are structured JSON bodies, not bare statuses:
/// - no token → 401, invalid/expired token → 401, inactive account → 401;
/// - directory failure → 500 (infrastructure, kept distinguishable from
///   credential failures in both the response and the logs).
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(req.headers()) else {
        return json_error(axum::http::StatusCode::UNAUTHORIZED, NO_TOKEN);
    };

    let claims = match state.authority.verify(&token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(reason = %err, "rejected session token");
            return json_error(axum::http::StatusCode::UNAUTHORIZED, INVALID_TOKEN);
        }
    };

    let account = match state.accounts.find(claims.sub).await {
        Ok(account) => account,
        Err(err) => {
            tracing::error!(subject = %claims.sub, error = %err, "account lookup failed");
            return json_error(axum::http::StatusCode::INTERNAL_SERVER_ERROR, AUTH_ERROR);
        }
    };

    let Some(account) = account.filter(|a| a.status.is_active()) else {
        return json_error(axum::http::StatusCode::UNAUTHORIZED, NOT_ACTIVE);
    };

    let renewal = renewal_cookie(&state.authority, &claims, &account);

    req.extensions_mut().insert(AuthContext::new(account, claims));

    let mut response = next.run(req).await;
    if let Some(cookie) = renewal {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// Candidate token: `Authorization: Bearer` preferred, `jwt` cookie fallback.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers)
        .map(str::to_string)
        .or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(TOKEN_COOKIE) {
                let token = parts.next().unwrap_or("").trim();
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

/// Sliding renewal: when the presented token is close to expiry, stamp a
/// fresh one for the resolved account into a `Set-Cookie` header.
///
/// Renewal failure is never fatal; the presented token is still valid.
fn renewal_cookie(
    authority: &TokenAuthority,
    claims: &Claims,
    account: &Account,
) -> Option<HeaderValue> {
    let remaining = claims.exp - Utc::now().timestamp();
    if remaining >= RENEWAL_WINDOW_SECS {
        return None;
    }

    let permissions = if account.permissions.is_empty() {
        permissions_for_role(&account.role)
    } else {
        account.permissions.clone()
    };

    let identity = Identity {
        subject: account.id,
        username: account.username.clone(),
        email: account.email.clone(),
        role: account.role.clone(),
        permissions,
    };

    let token = match authority.issue(&identity) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(subject = %account.id, error = %err, "token renewal failed");
            return None;
        }
    };

    let cookie = format!(
        "{TOKEN_COOKIE}={token}; HttpOnly; SameSite=Strict; Max-Age={}; Path=/",
        authority.ttl().num_seconds()
    );
    HeaderValue::from_str(&cookie).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let h = headers(&[
            ("authorization", "Bearer from-header"),
            ("cookie", "jwt=from-cookie"),
        ]);
        assert_eq!(extract_token(&h).as_deref(), Some("from-header"));
    }

    #[test]
    fn cookie_is_used_when_header_absent() {
        let h = headers(&[("cookie", "theme=dark; jwt=from-cookie; lang=en")]);
        assert_eq!(extract_token(&h).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn malformed_bearer_is_ignored() {
        let h = headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&h), None);
    }

    #[test]
    fn empty_values_yield_no_token() {
        assert_eq!(extract_token(&headers(&[])), None);
        assert_eq!(extract_token(&headers(&[("authorization", "Bearer ")])), None);
        assert_eq!(extract_token(&headers(&[("cookie", "jwt=")])), None);
    }
}
