use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the password inside a username token is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PasswordType {
    /// Cleartext password (`#PasswordText`).
    Text,
    /// `Base64(SHA-1(nonce + created + password))` (`#PasswordDigest`).
    Digest,
    /// Any other type URI.
    Other(String),
}

impl PasswordType {
    pub const TEXT_URI: &'static str = "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordText";
    pub const DIGEST_URI: &'static str = "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest";

    /// Interpret a `Type` attribute. An absent attribute means cleartext.
    pub fn from_uri(uri: Option<&str>) -> Self {
        match uri.map(str::trim) {
            None | Some("") => PasswordType::Text,
            Some(PasswordType::TEXT_URI) => PasswordType::Text,
            Some(PasswordType::DIGEST_URI) => PasswordType::Digest,
            Some(other) => PasswordType::Other(other.to_string()),
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            PasswordType::Text => Self::TEXT_URI,
            PasswordType::Digest => Self::DIGEST_URI,
            PasswordType::Other(uri) => uri,
        }
    }
}

/// Transport-agnostic username token (WS-Security UsernameToken profile).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameToken {
    pub username: String,
    pub password: String,
    pub password_type: PasswordType,

    /// Optional creation timestamp carried by the token.
    pub created: Option<DateTime<Utc>>,
}

/// Freshness window for token creation timestamps.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    /// Maximum age of a token.
    pub ttl: Duration,

    /// Tolerated clock skew for tokens stamped in the future.
    pub future_ttl: Duration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(300),
            future_ttl: Duration::seconds(60),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token created in the future")]
    CreatedInFuture,
}

/// Deterministically validate a token creation timestamp against `now`.
pub fn validate_created(
    created: DateTime<Utc>,
    policy: &TokenPolicy,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if created > now + policy.future_ttl {
        return Err(TokenValidationError::CreatedInFuture);
    }
    if now - created > policy.ttl {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
