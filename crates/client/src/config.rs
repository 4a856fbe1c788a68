//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPPRO_BRIDGE_URL` - Base URL of the backend bridge
//!
//! ## Optional
//! - `SHOPPRO_BRIDGE_TOKEN` - Bearer token for the bridge, if it requires one
//! - `SHOPPRO_REQUEST_TIMEOUT_SECS` - Per-call timeout (default: 30)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client engine configuration.
///
/// Implements `Debug` manually to redact the bridge token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the backend bridge.
    pub bridge_url: Url,
    /// Bearer token sent with every bridge request, if configured.
    pub bridge_token: Option<SecretString>,
    /// Per-call transport timeout. A timed-out call is a transport failure.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("bridge_url", &self.bridge_url.as_str())
            .field(
                "bridge_token",
                &self.bridge_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for the given bridge URL with defaults.
    #[must_use]
    pub const fn new(bridge_url: Url) -> Self {
        Self {
            bridge_url,
            bridge_token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let bridge_url = std::env::var("SHOPPRO_BRIDGE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("SHOPPRO_BRIDGE_URL".to_string()))?;
        let bridge_url = Url::parse(&bridge_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPPRO_BRIDGE_URL".to_string(), e.to_string())
        })?;

        let bridge_token = std::env::var("SHOPPRO_BRIDGE_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .map(SecretString::from);

        let timeout_secs = match std::env::var("SHOPPRO_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPPRO_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            bridge_url,
            bridge_token,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
