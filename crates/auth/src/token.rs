use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_window, Claims, TokenValidationError};
use crate::{Permission, Role, SubjectId};

/// The identity facts stamped into a freshly issued token.
///
/// Timestamps are added by [`TokenAuthority::issue`]; everything else comes
/// from the caller (typically the login/registration flow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: SubjectId,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Error)]
#[error("failed to sign token")]
pub struct IssueError(#[source] jsonwebtoken::errors::Error);

/// Why a presented token was rejected.
///
/// Rejection is an expected, non-exceptional outcome: a bad token is an
/// ordinary `Err`, never a panic. Variants exist for log granularity; the
/// HTTP layer collapses them all into one 401 response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token is malformed")]
    Malformed,
}

impl From<TokenValidationError> for VerifyError {
    fn from(err: TokenValidationError) -> Self {
        match err {
            TokenValidationError::Expired => VerifyError::Expired,
            TokenValidationError::NotYetValid => VerifyError::NotYetValid,
            TokenValidationError::InvalidTimeWindow => VerifyError::Malformed,
        }
    }
}

/// Issues and verifies HS256-signed session tokens.
///
/// The signing secret is injected at construction; there is no ambient or
/// default secret. All instances of a deployment must share the same secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    /// Authority with the default 24h token lifetime.
    pub fn hs256(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::hours(24))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is the sole invalidation mechanism; no grace window.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `identity`, valid from now until now + ttl.
    pub fn issue(&self, identity: &Identity) -> Result<String, IssueError> {
        self.issue_at(identity, Utc::now())
    }

    /// Deterministic variant of [`issue`](Self::issue) for a fixed clock.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, IssueError> {
        let claims = Claims {
            sub: identity.subject,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role.clone(),
            permissions: identity.permissions.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(IssueError)
    }

    /// Verify signature and validity window, then decode normalized claims.
    ///
    /// An unverifiable token carries no trustworthy information, so no claim
    /// data is returned on failure.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                ErrorKind::ImmatureSignature => VerifyError::NotYetValid,
                ErrorKind::InvalidSignature => VerifyError::BadSignature,
                _ => VerifyError::Malformed,
            })?;

        // jsonwebtoken covers `exp`; the window check additionally rejects
        // tokens issued in the future and inverted windows.
        validate_window(&data.claims, Utc::now())?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    fn identity() -> Identity {
        Identity {
            subject: SubjectId::new(42),
            username: "priya".to_string(),
            email: Some("p@example.com".to_string()),
            role: Role::new("admin"),
            permissions: vec![Permission::new("manage_inventory")],
        }
    }

    fn raw_token(payload: &serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            payload,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[test]
    fn round_trip_preserves_claims() {
        let authority = TokenAuthority::hs256(SECRET);
        let id = identity();

        let token = authority.issue(&id).unwrap();
        let claims = authority.verify(&token).unwrap();

        assert_eq!(claims.sub, id.subject);
        assert_eq!(claims.username, id.username);
        assert_eq!(claims.email, id.email);
        assert_eq!(claims.role, id.role);
        assert_eq!(claims.permissions, id.permissions);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let authority = TokenAuthority::with_ttl(SECRET, Duration::hours(1));
        let token = authority
            .issue_at(&identity(), Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(authority.verify(&token), Err(VerifyError::Expired));
    }

    #[test]
    fn not_yet_valid_token_is_rejected() {
        let authority = TokenAuthority::with_ttl(SECRET, Duration::hours(1));
        let token = authority
            .issue_at(&identity(), Utc::now() + Duration::hours(1))
            .unwrap();

        assert_eq!(authority.verify(&token), Err(VerifyError::NotYetValid));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let authority = TokenAuthority::hs256(SECRET);
        let token = authority.issue(&identity()).unwrap();

        // Flip one character in the signature segment.
        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.ends_with('A') {
            format!("{head}.{}B", &sig[..sig.len() - 1])
        } else {
            format!("{head}.{}A", &sig[..sig.len() - 1])
        };

        assert!(authority.verify(&flipped).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenAuthority::hs256(b"other-secret");
        let verifier = TokenAuthority::hs256(SECRET);

        let token = issuer.issue(&identity()).unwrap();
        assert_eq!(verifier.verify(&token), Err(VerifyError::BadSignature));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let authority = TokenAuthority::hs256(SECRET);
        assert_eq!(
            authority.verify("not.a.token"),
            Err(VerifyError::Malformed)
        );
    }

    #[test]
    fn absent_permissions_normalize_to_empty() {
        let authority = TokenAuthority::hs256(SECRET);
        let now = Utc::now().timestamp();
        let token = raw_token(&serde_json::json!({
            "sub": 7,
            "username": "arun",
            "role": "customer",
            "iat": now - 10,
            "exp": now + 3600,
        }));

        let claims = authority.verify(&token).unwrap();
        assert!(claims.permissions.is_empty());
        assert_eq!(claims.email, None);
    }

    #[test]
    fn string_subject_is_coerced_to_number() {
        let authority = TokenAuthority::hs256(SECRET);
        let now = Utc::now().timestamp();
        let token = raw_token(&serde_json::json!({
            "sub": "42",
            "username": "priya",
            "role": "admin",
            "iat": now - 10,
            "exp": now + 3600,
        }));

        let claims = authority.verify(&token).unwrap();
        assert_eq!(claims.sub, SubjectId::new(42));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn round_trip_for_arbitrary_identities(
                subject in 1i64..1_000_000_000,
                username in "[a-z]{1,16}",
                email in proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
                role in "[a-zA-Z]{1,12}",
                permissions in proptest::collection::vec("[a-z]{1,8}:[a-z]{1,8}", 0..6),
            ) {
                let authority = TokenAuthority::hs256(SECRET);
                let id = Identity {
                    subject: SubjectId::new(subject),
                    username,
                    email,
                    role: Role::new(role),
                    permissions: permissions.into_iter().map(Permission::new).collect(),
                };

                let claims = authority.verify(&authority.issue(&id).unwrap()).unwrap();
                prop_assert_eq!(claims.sub, id.subject);
                prop_assert_eq!(claims.username, id.username);
                prop_assert_eq!(claims.email, id.email);
                prop_assert_eq!(claims.role, id.role);
                prop_assert_eq!(claims.permissions, id.permissions);
            }

            #[test]
            fn past_expiry_always_fails(
                age_hours in 2i64..10_000,
            ) {
                let authority = TokenAuthority::with_ttl(SECRET, Duration::hours(1));
                let token = authority
                    .issue_at(&identity(), Utc::now() - Duration::hours(age_hours))
                    .unwrap();
                prop_assert_eq!(authority.verify(&token), Err(VerifyError::Expired));
            }
        }
    }
}
