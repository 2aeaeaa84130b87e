//! WS-Security `UsernameToken` interceptor.
//!
//! Runs after endpoint mapping and before dispatch. Extracts the token from
//! the SOAP header and delegates the decision to `globalbooks-auth`.

use chrono::{DateTime, Utc};
use thiserror::Error;

use globalbooks_auth::{
    AuthError, CredentialVerifier, PasswordType, Principal, TokenPolicy, UsernameToken,
    authenticate,
};

use crate::soap::{Element, Envelope};

pub const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
pub const WSU_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("No WS-Security header found")]
    MissingSecurityHeader,

    #[error("security header has no UsernameToken")]
    MissingUsernameToken,

    #[error("UsernameToken has no {0}")]
    IncompleteToken(&'static str),

    #[error("invalid wsu:Created timestamp '{0}'")]
    InvalidCreated(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Pull the `UsernameToken` out of `Header/wsse:Security`.
pub fn extract_username_token(envelope: &Envelope) -> Result<UsernameToken, SecurityError> {
    let security = envelope
        .header
        .as_ref()
        .and_then(|header| header.child(WSSE_NS, "Security"))
        .ok_or(SecurityError::MissingSecurityHeader)?;

    let token = security
        .child(WSSE_NS, "UsernameToken")
        .ok_or(SecurityError::MissingUsernameToken)?;

    let username = required(token, "Username")?;
    let password = required(token, "Password")?;

    let created = match token.child(WSU_NS, "Created") {
        Some(created) => Some(
            DateTime::parse_from_rfc3339(created.text.trim())
                .map_err(|_| SecurityError::InvalidCreated(created.text.clone()))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    Ok(UsernameToken {
        username: username.text.clone(),
        password: password.text.clone(),
        password_type: PasswordType::from_uri(password.attribute("Type")),
        created,
    })
}

fn required<'a>(token: &'a Element, local_name: &'static str) -> Result<&'a Element, SecurityError> {
    token
        .child(WSSE_NS, local_name)
        .ok_or(SecurityError::IncompleteToken(local_name))
}

/// Authenticate the sender of `envelope`.
pub fn authenticate_envelope(
    envelope: &Envelope,
    verifier: &dyn CredentialVerifier,
    policy: &TokenPolicy,
    now: DateTime<Utc>,
) -> Result<Principal, SecurityError> {
    let token = extract_username_token(envelope)?;
    Ok(authenticate(&token, verifier, policy, now)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use globalbooks_auth::{StaticCredentials, TokenValidationError};

    use crate::soap::parse_envelope;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    fn envelope(header: &str) -> Envelope {
        let xml = format!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"
                  xmlns:wsse="{WSSE_NS}" xmlns:wsu="{WSU_NS}">
                 {header}
                 <soapenv:Body/>
               </soapenv:Envelope>"#
        );
        parse_envelope(&xml).unwrap()
    }

    fn token_header(username: &str, password: &str, extra: &str) -> String {
        format!(
            r#"<soapenv:Header><wsse:Security><wsse:UsernameToken>
                 <wsse:Username>{username}</wsse:Username>
                 <wsse:Password>{password}</wsse:Password>{extra}
               </wsse:UsernameToken></wsse:Security></soapenv:Header>"#
        )
    }

    fn verifier() -> StaticCredentials {
        StaticCredentials::from_pairs([("admin", "admin123")])
    }

    fn auth(env: &Envelope) -> Result<Principal, SecurityError> {
        authenticate_envelope(env, &verifier(), &TokenPolicy::default(), now())
    }

    #[test]
    fn extracts_text_token() {
        let env = envelope(&token_header("admin", "admin123", ""));
        let token = extract_username_token(&env).unwrap();
        assert_eq!(token.username, "admin");
        assert_eq!(token.password, "admin123");
        assert_eq!(token.password_type, PasswordType::Text);
        assert_eq!(token.created, None);
    }

    #[test]
    fn valid_token_authenticates() {
        let env = envelope(&token_header("admin", "admin123", ""));
        assert_eq!(auth(&env).unwrap().username(), "admin");
    }

    #[test]
    fn missing_header_or_security_element() {
        assert_eq!(auth(&envelope("")), Err(SecurityError::MissingSecurityHeader));
        assert_eq!(
            auth(&envelope("<soapenv:Header/>")),
            Err(SecurityError::MissingSecurityHeader)
        );
        assert_eq!(
            auth(&envelope("<soapenv:Header><wsse:Security/></soapenv:Header>")),
            Err(SecurityError::MissingUsernameToken)
        );
    }

    #[test]
    fn token_without_password_is_incomplete() {
        let env = envelope(
            "<soapenv:Header><wsse:Security><wsse:UsernameToken><wsse:Username>admin</wsse:Username></wsse:UsernameToken></wsse:Security></soapenv:Header>",
        );
        assert_eq!(auth(&env), Err(SecurityError::IncompleteToken("Password")));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let env = envelope(&token_header("admin", "nope", ""));
        assert_eq!(auth(&env), Err(SecurityError::Auth(AuthError::InvalidCredentials)));
    }

    #[test]
    fn digest_password_type_is_rejected() {
        let header = format!(
            r#"<soapenv:Header><wsse:Security><wsse:UsernameToken><wsse:Username>admin</wsse:Username><wsse:Password Type="{}">admin123</wsse:Password></wsse:UsernameToken></wsse:Security></soapenv:Header>"#,
            PasswordType::DIGEST_URI
        );
        assert!(matches!(
            auth(&envelope(&header)),
            Err(SecurityError::Auth(AuthError::UnsupportedPasswordType(_)))
        ));
    }

    #[test]
    fn created_timestamp_is_checked() {
        let fresh = (now() - Duration::seconds(10)).to_rfc3339();
        let env = envelope(&token_header(
            "admin",
            "admin123",
            &format!("<wsu:Created>{fresh}</wsu:Created>"),
        ));
        assert!(auth(&env).is_ok());

        let stale = (now() - Duration::hours(1)).to_rfc3339();
        let env = envelope(&token_header(
            "admin",
            "admin123",
            &format!("<wsu:Created>{stale}</wsu:Created>"),
        ));
        assert_eq!(
            auth(&env),
            Err(SecurityError::Auth(AuthError::Token(TokenValidationError::Expired)))
        );

        let env = envelope(&token_header(
            "admin",
            "admin123",
            "<wsu:Created>yesterday</wsu:Created>",
        ));
        assert_eq!(auth(&env), Err(SecurityError::InvalidCreated("yesterday".to_string())));
    }
}
