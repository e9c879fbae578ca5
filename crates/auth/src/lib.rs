//! `vastra-auth` — pure session-token authority (issuance, verification, policy).
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod roles;
pub mod subject;
pub mod token;

pub use authorize::{authorize_permission, authorize_role, permissions_for_role, AuthzError};
pub use claims::{validate_window, Claims, TokenValidationError};
pub use permissions::Permission;
pub use roles::Role;
pub use subject::SubjectId;
pub use token::{Identity, IssueError, TokenAuthority, VerifyError};
