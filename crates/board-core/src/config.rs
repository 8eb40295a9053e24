//! Store Configuration
//!
//! Where the remote JSON store lives and how the health probe behaves.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Probe abort deadline in milliseconds
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 7_000;
/// Interval between background probes in milliseconds
pub const DEFAULT_HEALTH_INTERVAL_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Base URL of the store, e.g. `https://board.example-db.app`
    pub base_url: String,
    /// Optional token sent as the `auth` query parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default = "default_health_timeout")]
    pub health_timeout_ms: u64,
    #[serde(default = "default_health_interval")]
    pub health_interval_ms: u64,
}

fn default_health_timeout() -> u64 {
    DEFAULT_HEALTH_TIMEOUT_MS
}

fn default_health_interval() -> u64 {
    DEFAULT_HEALTH_INTERVAL_MS
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            health_timeout_ms: DEFAULT_HEALTH_TIMEOUT_MS,
            health_interval_ms: DEFAULT_HEALTH_INTERVAL_MS,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(url.to_string()));
        }
        Ok(())
    }

    /// Base URL without trailing slashes
    pub fn normalized_base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    pub fn health_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.health_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_fills_defaults() {
        let config = StoreConfig::from_json(r#"{"baseUrl":"https://db.example.app/"}"#).unwrap();
        assert_eq!(config.normalized_base(), "https://db.example.app");
        assert_eq!(config.health_timeout_ms, 7_000);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(matches!(StoreConfig::new("").validate(), Err(ConfigError::EmptyUrl)));
        assert!(matches!(StoreConfig::new("ftp://db").validate(), Err(ConfigError::UnsupportedScheme(_))));
        assert!(matches!(StoreConfig::from_json("{}"), Err(ConfigError::Parse(_))));
        assert!(StoreConfig::new("http://127.0.0.1:9000").validate().is_ok());
    }
}
