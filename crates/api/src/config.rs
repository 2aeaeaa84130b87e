//! Service configuration, read once from the environment at startup.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `CATALOG_BIND_ADDR` | `0.0.0.0:8080` | listen address |
//! | `CATALOG_USERS` | development table | JSON object `{"user": "password", ...}` |

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;

use globalbooks_auth::{StaticCredentials, TokenPolicy};

pub const BIND_ADDR_VAR: &str = "CATALOG_BIND_ADDR";
pub const USERS_VAR: &str = "CATALOG_USERS";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CATALOG_BIND_ADDR='{value}' is not a socket address: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("CATALOG_USERS is not a JSON object of username to password: {0}")]
    InvalidUsers(#[from] serde_json::Error),

    #[error("CATALOG_USERS must define at least one user")]
    NoUsers,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub credentials: StaticCredentials,
    pub token_policy: TokenPolicy,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_value = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let credentials = match lookup(USERS_VAR) {
            Some(raw) => {
                let users: HashMap<String, String> = serde_json::from_str(&raw)?;
                if users.is_empty() {
                    return Err(ConfigError::NoUsers);
                }
                StaticCredentials::new(users)
            }
            None => {
                tracing::warn!("{USERS_VAR} not set; using insecure development credentials");
                dev_credentials()
            }
        };

        Ok(Self {
            bind_addr,
            credentials,
            token_policy: TokenPolicy::default(),
        })
    }
}

/// Development-only credential table.
pub fn dev_credentials() -> StaticCredentials {
    StaticCredentials::from_pairs([("admin", "admin123"), ("client", "client456")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use globalbooks_auth::CredentialVerifier;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert!(cfg.credentials.verify("admin", "admin123"));
        assert!(cfg.credentials.verify("client", "client456"));
        assert_eq!(cfg.token_policy, TokenPolicy::default());
    }

    #[test]
    fn reads_bind_addr_and_users() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, "127.0.0.1:9090"),
            (USERS_VAR, r#"{"ops": "s3cret"}"#),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9090);
        assert!(cfg.credentials.verify("ops", "s3cret"));
        assert!(!cfg.credentials.verify("admin", "admin123"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")])),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[(USERS_VAR, "admin:admin123")])),
            Err(ConfigError::InvalidUsers(_))
        ));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[(USERS_VAR, "{}")])),
            Err(ConfigError::NoUsers)
        ));
    }
}
