//! Client configuration.
//!
//! A single base URL identifies the service root; the only other knob is the
//! transport timeout. Configuration is loaded from environment variables
//! with defaults suitable for local development.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Stamps service client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampsConfig {
    /// Base URL of the service root (e.g. "http://localhost:9999/api/v1").
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StampsConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9999/api/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl StampsConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STAMP_URL`: service root URL (default: http://localhost:9999/api/v1)
    /// - `STAMP_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_url: std::env::var("STAMP_URL").unwrap_or(default.base_url),
            timeout_secs: std::env::var("STAMP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
        }
    }

    /// Create a configuration pointing at the given service root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StampsConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_url_join() {
        let config = StampsConfig::new("http://localhost:9999/api/v1");

        assert_eq!(config.url("/stamps"), "http://localhost:9999/api/v1/stamps");
        assert_eq!(config.url("stamps"), "http://localhost:9999/api/v1/stamps");
    }

    #[test]
    fn test_url_join_trailing_slash() {
        let config = StampsConfig::new("http://localhost:9999/api/v1/");

        assert_eq!(
            config.url("stamps/42"),
            "http://localhost:9999/api/v1/stamps/42"
        );
    }
}
