//! Configuration for the store connection
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default local server
const DEFAULT_URI: &str = "mongodb://localhost:27017";

/// Application name reported to the server during the handshake
const DEFAULT_APP_NAME: &str = "compression-demo";

/// Store connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection string
    pub uri: String,
    /// Application name sent in the handshake
    pub app_name: String,
    /// Socket connect timeout
    #[serde(with = "secs")]
    pub connect_timeout: Duration,
    /// How long to wait for a usable server
    #[serde(with = "secs")]
    pub server_selection_timeout: Duration,
}

mod secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(10),
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `WIREBENCH_URI` or `MONGODB_URI`: connection string
    /// - `WIREBENCH_APP_NAME`: application name sent in the handshake
    /// - `WIREBENCH_CONNECT_TIMEOUT_SECS`: connect and server selection timeout
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Try WIREBENCH_URI first, then MONGODB_URI, then default
        let uri = lookup("WIREBENCH_URI")
            .or_else(|| lookup("MONGODB_URI"))
            .unwrap_or(defaults.uri);

        let app_name = lookup("WIREBENCH_APP_NAME").unwrap_or(defaults.app_name);

        let timeout = lookup("WIREBENCH_CONNECT_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_secs);

        Self {
            uri,
            app_name,
            connect_timeout: timeout.unwrap_or(defaults.connect_timeout),
            server_selection_timeout: timeout.unwrap_or(defaults.server_selection_timeout),
        }
    }

    /// Builder-style method to set the connection string
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Builder-style method to set the application name
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Builder-style method to set both connection timeouts
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.server_selection_timeout = timeout;
        self
    }

    /// Connection string with any credentials masked, safe for logs
    #[must_use]
    pub fn redacted_uri(&self) -> String {
        let Some((scheme, rest)) = self.uri.split_once("://") else {
            return self.uri.clone();
        };

        let authority_end = rest.find('/').unwrap_or(rest.len());
        match rest[..authority_end].rfind('@') {
            Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
            None => self.uri.clone(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> StoreResult<()> {
        if self.uri.is_empty() {
            return Err(StoreError::config("uri cannot be empty"));
        }

        if !self.uri.starts_with("mongodb://") && !self.uri.starts_with("mongodb+srv://") {
            return Err(StoreError::config(
                "uri must start with mongodb:// or mongodb+srv://",
            ));
        }

        if self.app_name.is_empty() {
            return Err(StoreError::config("app_name cannot be empty"));
        }

        if self.connect_timeout.is_zero() || self.server_selection_timeout.is_zero() {
            return Err(StoreError::config("timeouts cannot be zero"));
        }

        Ok(())
    }
}
