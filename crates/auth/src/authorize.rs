//! Pure policy checks for verified claims.
//!
//! - No IO
//! - No panics
//! - Transport mapping (403 responses etc.) belongs to the API layer.

use std::collections::HashSet;

use thiserror::Error;

use crate::{Claims, Permission, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Insufficient permissions ({0} required)")]
    MissingPermission(String),

    #[error("Insufficient role permissions ({0} required)")]
    RoleNotAccepted(String),
}

/// Check that the claims grant `required`.
pub fn authorize_permission(claims: &Claims, required: &Permission) -> Result<(), AuthzError> {
    let held: HashSet<&str> = claims.permissions.iter().map(|p| p.as_str()).collect();

    if held.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::MissingPermission(required.as_str().to_string()))
    }
}

/// Check that the claims carry one of the `accepted` roles.
///
/// On mismatch the error names every acceptable role so the caller can see
/// what would have been allowed.
pub fn authorize_role(claims: &Claims, accepted: &[Role]) -> Result<(), AuthzError> {
    if accepted.iter().any(|r| r.as_str() == claims.role.as_str()) {
        Ok(())
    } else {
        let wanted = accepted
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        Err(AuthzError::RoleNotAccepted(wanted))
    }
}

/// Static role→permission policy for the storefront.
///
/// Unknown roles carry no permissions. This is the issuance-side source of
/// truth: tokens are stamped with the permissions their role grants.
pub fn permissions_for_role(role: &Role) -> Vec<Permission> {
    let grants: &[&'static str] = match role.as_str() {
        "admin" => &[
            "admin:access",
            "user:read",
            "user:write",
            "product:read",
            "product:write",
            "inventory:read",
            "inventory:write",
            "order:read",
            "order:write",
            "review:read",
            "review:write",
            "dashboard:access",
            "returns:manage",
        ],
        "contentManager" => &[
            "product:read",
            "product:write",
            "inventory:read",
            "inventory:write",
        ],
        "customer" => &[
            "product:read",
            "review:write",
            "order:read",
            "wishlist:read",
            "wishlist:write",
            "profile:read",
            "profile:write",
            "returns:request",
        ],
        _ => &[],
    };

    grants.iter().map(|p| Permission::new(*p)).collect()
}
