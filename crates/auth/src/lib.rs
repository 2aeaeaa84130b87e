//! `globalbooks-auth`: credential verification boundary.
//!
//! This crate is intentionally decoupled from HTTP and XML: the transport
//! extracts a [`UsernameToken`] from whatever envelope it speaks and hands it
//! to [`authenticate`].

pub mod principal;
pub mod token;
pub mod verifier;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use principal::Principal;
pub use token::{PasswordType, TokenPolicy, TokenValidationError, UsernameToken, validate_created};
pub use verifier::{CredentialVerifier, StaticCredentials};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("unsupported password type '{0}'")]
    UnsupportedPasswordType(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenValidationError),
}

/// Authenticate a username token against a credential source.
///
/// Order of checks: password type, token freshness, then credentials. The
/// verifier is never consulted for a token that fails the earlier checks.
pub fn authenticate(
    token: &UsernameToken,
    verifier: &dyn CredentialVerifier,
    policy: &TokenPolicy,
    now: DateTime<Utc>,
) -> Result<Principal, AuthError> {
    if token.password_type != PasswordType::Text {
        return Err(AuthError::UnsupportedPasswordType(
            token.password_type.uri().to_string(),
        ));
    }

    if let Some(created) = token.created {
        validate_created(created, policy, now)?;
    }

    if verifier.verify(&token.username, &token.password) {
        Ok(Principal::new(token.username.clone()))
    } else {
        tracing::warn!(username = %token.username, "credential check failed");
        Err(AuthError::InvalidCredentials)
    }
}
