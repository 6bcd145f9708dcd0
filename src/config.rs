//! Client configuration.

use std::time::Duration;

use crate::{Error, Result};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://zetsubou.life";

/// Resolved configuration for one client instance.
///
/// Each client is independently configurable; there is no process-global
/// state beyond the env var consulted during key resolution.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key, `ztb_live_...`-style.
    pub api_key: String,
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry budget for transient failures (5xx, connect/timeout errors).
    /// `retry_attempts = 3` means up to 4 total attempts.
    pub retry_attempts: u32,
    /// Backoff base: the delay before retry `n` is `retry_backoff * 2^n`.
    /// Defaults to 1s, i.e. 1s, 2s, 4s, ...
    pub retry_backoff: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry_attempts: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }

    /// Validate the config; normalizes the base URL (strips trailing slash).
    pub fn validate(mut self) -> Result<Self> {
        if self.api_key.is_empty() {
            return Err(Error::Configuration("API key must not be empty".into()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::Configuration(format!("invalid base URL '{}': {e}", self.base_url)))?;
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        Ok(self)
    }
}

/// Resolve an API key from ambient sources.
///
/// Order: OS keyring (`zetsubou` / `api-key`), then the `ZETSUBOU_API_KEY`
/// environment variable.
pub fn resolve_api_key() -> Option<String> {
    if let Ok(entry) = keyring::Entry::new("zetsubou", "api-key") {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }
    std::env::var("ZETSUBOU_API_KEY").ok()
}
