// SPDX-License-Identifier: BUSL-1.1
//! Backend connection configuration.
//!
//! Defaults point at a locally running `inventa-stub`. Override via
//! environment variables or explicit construction.

use url::Url;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8090";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the Inventa backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend; resource paths are appended as `api/{resource}`.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `INVENTA_API_URL` (default: `http://127.0.0.1:8090`)
    /// - `INVENTA_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("INVENTA_API_URL", DEFAULT_API_URL)?,
            timeout_secs: std::env::var("INVENTA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration from an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Create a configuration pointing to a loopback server (for testing).
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        let mut config = Self::new(&format!("http://127.0.0.1:{port}"))?;
        config.timeout_secs = 5;
        Ok(config)
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
