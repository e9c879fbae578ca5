use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Permission, Role, SubjectId};

/// Session token claims (transport-agnostic).
///
/// This is the payload carried inside every signed token. `sub` and `role`
/// are always present; `email` may be absent and `permissions` defaults to
/// the empty set when the raw payload omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id).
    pub sub: SubjectId,

    /// Display/login name, informational only.
    pub username: String,

    /// Optional contact address.
    #[serde(default)]
    pub email: Option<String>,

    /// Coarse-grained role label.
    pub role: Role,

    /// Fine-grained permission grants.
    #[serde(default)]
    pub permissions: Vec<Permission>,

    /// Issued-at, seconds since epoch.
    pub iat: i64,

    /// Expiration, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions
            .iter()
            .any(|p| p.as_str() == permission.as_str())
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim validity window.
///
/// Note: this validates the *claims* only. Signature verification lives in
/// [`crate::token`].
pub fn validate_window(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now.timestamp() < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now.timestamp() >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
