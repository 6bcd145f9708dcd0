//! The main client.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! One client instance owns one pooled network session; every resource
//! namespace hands out a cheap handle onto it.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::{resolve_api_key, ClientConfig};
use crate::services::{
    AccountClient, ChatClient, GraphqlClient, JobsClient, NftClient, ToolsClient, VfsClient,
    WebhooksClient,
};
use crate::transport::HttpTransport;
use crate::{Error, Result};

/// Client for the Zetsubou.life API v2.
///
/// Cloning is cheap (all state sits behind one `Arc`) and every clone shares
/// the same connection pool, which is safe for concurrent use from multiple
/// tasks. Connections are released when the last clone is dropped; there is
/// no explicit close step.
///
/// ```no_run
/// use zetsubou::ZetsubouClient;
///
/// # async fn run() -> zetsubou::Result<()> {
/// let client = ZetsubouClient::builder()
///     .api_key("ztb_live_...")
///     .build()?;
///
/// for tool in client.tools().list().await? {
///     println!("{} ({})", tool.name, tool.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ZetsubouClient {
    transport: Arc<HttpTransport>,
}

impl ZetsubouClient {
    /// Build a client with an explicit API key and all other settings at
    /// their defaults.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> ZetsubouClientBuilder {
        ZetsubouClientBuilder::new()
    }

    /// Tool catalog and execution.
    pub fn tools(&self) -> ToolsClient {
        ToolsClient::new(self.transport.clone())
    }

    /// Job lifecycle and polling.
    pub fn jobs(&self) -> JobsClient {
        JobsClient::new(self.transport.clone())
    }

    /// Virtual file system.
    pub fn vfs(&self) -> VfsClient {
        VfsClient::new(self.transport.clone())
    }

    /// Chat conversations and exports.
    pub fn chat(&self) -> ChatClient {
        ChatClient::new(self.transport.clone())
    }

    /// Webhook subscriptions.
    pub fn webhooks(&self) -> WebhooksClient {
        WebhooksClient::new(self.transport.clone())
    }

    /// Account, usage and API keys.
    pub fn account(&self) -> AccountClient {
        AccountClient::new(self.transport.clone())
    }

    /// NFT projects and generations.
    pub fn nft(&self) -> NftClient {
        NftClient::new(self.transport.clone())
    }

    /// GraphQL endpoint.
    pub fn graphql(&self) -> GraphqlClient {
        GraphqlClient::new(self.transport.clone())
    }

    /// Liveness probe against `/health`; the body shape is unspecified.
    pub async fn health_check(&self) -> Result<Value> {
        self.transport.get("/health").await
    }

    /// The resolved configuration this client runs with.
    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }
}

/// Builder for [`ZetsubouClient`].
pub struct ZetsubouClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    retry_attempts: Option<u32>,
    retry_backoff: Option<Duration>,
}

impl ZetsubouClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: None,
            retry_attempts: None,
            retry_backoff: None,
        }
    }

    /// Set the API key explicitly. When unset, the builder falls back to the
    /// OS keyring and then the `ZETSUBOU_API_KEY` environment variable.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the base URL (primarily for testing with mock servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout. Default 30s.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retry budget for transient failures. Default 3 (up to 4 attempts).
    pub fn retry_attempts(mut self, retries: u32) -> Self {
        self.retry_attempts = Some(retries);
        self
    }

    /// Backoff base for the exponential retry delay. Default 1s.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    pub fn build(self) -> Result<ZetsubouClient> {
        let api_key = self
            .api_key
            .or_else(resolve_api_key)
            .ok_or_else(|| {
                Error::Configuration(
                    "no API key: pass one to the builder, store one in the keyring, or set ZETSUBOU_API_KEY".into(),
                )
            })?;

        let mut config = ClientConfig::new(api_key);
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(retry_attempts) = self.retry_attempts {
            config.retry_attempts = retry_attempts;
        }
        if let Some(retry_backoff) = self.retry_backoff {
            config.retry_backoff = retry_backoff;
        }

        let transport = HttpTransport::new(config.validate()?)?;
        Ok(ZetsubouClient {
            transport: Arc::new(transport),
        })
    }
}

impl Default for ZetsubouClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
