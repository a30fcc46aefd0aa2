//! Server configuration.
//!
//! Values start from [`ServerConfig::default`], are replaced by an optional
//! JSON file and finally by `BANKSIM_*` environment variables.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

pub const LEDGER_ADDR_VAR: &str = "BANKSIM_LEDGER_ADDR";
pub const USER_ADDR_VAR: &str = "BANKSIM_USER_ADDR";
pub const USER_SERVICE_URL_VAR: &str = "BANKSIM_USER_SERVICE_URL";
pub const LOG_FILTER_VAR: &str = "BANKSIM_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address of the ledger service
    pub ledger_addr: SocketAddr,
    /// Bind address of the user service
    pub user_addr: SocketAddr,
    /// Base URL the ledger uses to reach the user service
    pub user_service_url: String,
    /// Default tracing filter, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            ledger_addr: SocketAddr::from(([127, 0, 0, 1], 50051)),
            user_addr: SocketAddr::from(([127, 0, 0, 1], 50052)),
            user_service_url: "http://127.0.0.1:50052".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Replace fields with whatever `lookup` returns for the `BANKSIM_*` keys
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(LEDGER_ADDR_VAR) {
            self.ledger_addr = parse_addr(LEDGER_ADDR_VAR, &value)?;
        }
        if let Some(value) = lookup(USER_ADDR_VAR) {
            self.user_addr = parse_addr(USER_ADDR_VAR, &value)?;
        }
        if let Some(value) = lookup(USER_SERVICE_URL_VAR) {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: USER_SERVICE_URL_VAR.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            self.user_service_url = value;
        }
        if let Some(value) = lookup(LOG_FILTER_VAR) {
            self.log_filter = value;
        }
        Ok(self)
    }

    /// File (if any) first, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.apply_overrides(|key| std::env::var(key).ok())
    }
}

fn parse_addr(key: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{}: {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.ledger_addr.to_string(), "127.0.0.1:50051");
        assert_eq!(config.user_addr.to_string(), "127.0.0.1:50052");
        assert_eq!(config.user_service_url, "http://127.0.0.1:50052");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"ledger_addr": "0.0.0.0:7000"}"#).unwrap();
        assert_eq!(config.ledger_addr.to_string(), "0.0.0.0:7000");
        assert_eq!(config.user_addr, ServerConfig::default().user_addr);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (USER_ADDR_VAR, "127.0.0.1:9000"),
            (USER_SERVICE_URL_VAR, "http://users.internal:9000"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::default()
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.user_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.user_service_url, "http://users.internal:9000");
        assert_eq!(config.ledger_addr, ServerConfig::default().ledger_addr);
    }

    #[test]
    fn test_bad_address_override() {
        let err = ServerConfig::default()
            .apply_overrides(|key| (key == LEDGER_ADDR_VAR).then(|| "nowhere".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == LEDGER_ADDR_VAR));
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::load(Some(Path::new("/nonexistent/banksim.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
