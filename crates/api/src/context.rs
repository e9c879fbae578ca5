use vastra_auth::Claims;

use crate::directory::Account;

/// Authenticated request context.
///
/// Inserted into request extensions by the auth middleware; downstream
/// handlers and guards read it through typed accessors instead of poking at
/// dynamic request fields.
#[derive(Debug, Clone)]
pub struct AuthContext {
    account: Account,
    claims: Claims,
}

impl AuthContext {
    pub fn new(account: Account, claims: Claims) -> Self {
        Self { account, claims }
    }

    /// The account resolved from the directory (fresh, not token-derived).
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// The verified token claims the request presented.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
