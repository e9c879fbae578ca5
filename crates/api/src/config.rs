//! Environment-driven configuration for the gateway binary.

use anyhow::{bail, Context};
use chrono::Duration;

/// Runtime configuration, read once at process start.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Shared HS256 signing secret. Required: there is deliberately no
    /// hardcoded fallback, so a deployment can never run on a default secret.
    pub jwt_secret: String,

    /// Token lifetime stamped at issuance.
    pub token_ttl: Duration,

    /// Base URL of the external account (user) service.
    pub account_service_url: String,

    /// Listen address.
    pub bind_addr: String,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret =
            std::env::var("JWT_SECRET").context("JWT_SECRET must be set (no default secret)")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let token_ttl = match std::env::var("JWT_EXPIRES_IN") {
            Ok(raw) => parse_duration(&raw)
                .with_context(|| format!("invalid JWT_EXPIRES_IN value: {raw:?}"))?,
            Err(_) => Duration::hours(24),
        };

        let account_service_url = std::env::var("ACCOUNT_SERVICE_URL")
            .context("ACCOUNT_SERVICE_URL must be set (base URL of the user service)")?;

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Ok(Self {
            jwt_secret,
            token_ttl,
            account_service_url,
            bind_addr,
        })
    }
}

/// Parse a compact duration string: `"45s"`, `"30m"`, `"24h"`, `"7d"`.
///
/// A bare number is taken as seconds.
pub fn parse_duration(raw: &str) -> anyhow::Result<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("empty duration");
    }

    let (value, unit) = match raw.chars().last() {
        Some(c) if c.is_ascii_digit() => (raw, "s"),
        Some(_) => raw.split_at(raw.len() - 1),
        None => bail!("empty duration"),
    };

    let n: i64 = value.parse().context("duration is not numeric")?;
    if n <= 0 {
        bail!("duration must be positive");
    }

    let duration = match unit {
        "s" => Duration::seconds(n),
        "m" => Duration::minutes(n),
        "h" => Duration::hours(n),
        "d" => Duration::days(n),
        other => bail!("unknown duration unit {other:?} (expected s, m, h or d)"),
    };

    Ok(duration)
}
