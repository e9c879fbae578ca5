//! Account lookup collaborator.
//!
//! The gateway never owns account data; it resolves the token subject against
//! the external user service on every authenticated request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vastra_auth::{Permission, Role, SubjectId};

/// Account status as reported by the user service.
///
/// Only `active` accounts may authenticate. Statuses this gateway does not
/// know about still deserialize (as [`AccountStatus::Other`]) and are treated
/// as not active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
    #[serde(other)]
    Other,
}

impl AccountStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, AccountStatus::Active)
    }
}

/// Account record owned by the external user service (read-only here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: SubjectId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub status: AccountStatus,
}

/// Infrastructure failure while resolving an account.
///
/// Distinct from "not found": lookup errors surface as 500 to the caller,
/// a missing account as 401.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("account service transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("account service responded with status {0}")]
    Upstream(u16),
}

/// Resolve a token subject to an account record.
///
/// Implementations may be remote; a raised error means "the dependency is
/// broken", never "the account does not exist".
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find(&self, subject: SubjectId) -> Result<Option<Account>, DirectoryError>;
}

/// [`AccountDirectory`] backed by the user service's REST API.
pub struct HttpAccountDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAccountDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AccountDirectory for HttpAccountDirectory {
    async fn find(&self, subject: SubjectId) -> Result<Option<Account>, DirectoryError> {
        let url = format!("{}/api/users/{}", self.base_url, subject);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DirectoryError::Upstream(response.status().as_u16()));
        }

        let account = response.json::<Account>().await?;
        Ok(Some(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_deserializes_and_is_not_active() {
        let raw = serde_json::json!({
            "id": 9,
            "username": "meera",
            "role": "customer",
            "status": "archived",
        });
        let account: Account = serde_json::from_value(raw).unwrap();
        assert_eq!(account.status, AccountStatus::Other);
        assert!(!account.status.is_active());
        assert!(account.permissions.is_empty());
    }

    #[test]
    fn active_status_round_trips() {
        let raw = serde_json::json!({
            "id": "12",
            "username": "priya",
            "email": "p@example.com",
            "role": "admin",
            "permissions": ["user:read"],
            "status": "active",
        });
        let account: Account = serde_json::from_value(raw).unwrap();
        assert!(account.status.is_active());
        assert_eq!(account.id, SubjectId::new(12));
    }
}
