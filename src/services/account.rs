//! Account, usage and API key introspection.

use std::sync::Arc;

use serde_json::Value;

use crate::transport::HttpTransport;
use crate::types::{Account, ApiKey, OptionsMap, StorageQuota};
use crate::Result;

use super::{decode, decode_field, success_flag};

/// Subscription summary derived from one account fetch.
#[derive(Debug, Clone)]
pub struct TierInfo {
    pub tier: String,
    pub subscription: OptionsMap,
    pub features: OptionsMap,
}

/// Tier-dependent request limits.
#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    pub max_concurrent_jobs: u64,
    pub rate_limit_per_minute: u64,
}

/// Accessor for `/api/v2/account` and `/api/v2/storage`.
#[derive(Clone)]
pub struct AccountClient {
    transport: Arc<HttpTransport>,
}

impl AccountClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn get(&self) -> Result<Account> {
        let body = self.transport.get("/api/v2/account").await?;
        decode(body)
    }

    pub async fn storage_quota(&self) -> Result<StorageQuota> {
        let body = self.transport.get("/api/v2/storage/quota").await?;
        decode(body)
    }

    /// Usage statistics for a trailing period (`7d`, `30d`, `90d`, `1y`),
    /// optionally restricted to one tool.
    pub async fn usage_stats(&self, period: &str, tool_id: Option<&str>) -> Result<Value> {
        let mut query = vec![("period".to_string(), period.to_string())];
        if let Some(tool_id) = tool_id {
            query.push(("tool_id".to_string(), tool_id.to_string()));
        }
        self.transport.get_with("/api/v2/account/usage", &query).await
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>> {
        let body = self.transport.get("/api/v2/account/api-keys").await?;
        decode_field(body, "api_keys")
    }

    /// Issue a new API key. The response is the only place the secret ever
    /// appears.
    pub async fn create_api_key(
        &self,
        name: &str,
        scopes: Vec<String>,
        expires_at: Option<&str>,
        drive_bypass: bool,
    ) -> Result<Value> {
        let mut payload = serde_json::json!({
            "name": name,
            "scopes": scopes,
            "drive_bypass": drive_bypass,
        });
        if let Some(expires_at) = expires_at {
            payload["expires_at"] = Value::String(expires_at.to_string());
        }
        self.transport.post("/api/v2/account/api-keys", payload).await
    }

    pub async fn delete_api_key(&self, key_id: i64) -> Result<bool> {
        let body = self
            .transport
            .delete(&format!("/api/v2/account/api-keys/{key_id}"))
            .await?;
        Ok(success_flag(&body))
    }

    /// Tier, subscription and feature maps from one account fetch.
    pub async fn tier_info(&self) -> Result<TierInfo> {
        let account = self.get().await?;
        Ok(TierInfo {
            tier: account.tier,
            subscription: account.subscription,
            features: account.features,
        })
    }

    /// Tool ids the current tier may run, per the feature map.
    pub async fn available_tools(&self) -> Result<Vec<String>> {
        let account = self.get().await?;
        Ok(account
            .features
            .get("tools")
            .and_then(Value::as_array)
            .map(|tools| {
                tools
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Request limits for the current tier, with conservative defaults when
    /// the feature map does not spell them out.
    pub async fn rate_limits(&self) -> Result<RateLimits> {
        let account = self.get().await?;
        let get = |key: &str, default: u64| {
            account.features.get(key).and_then(Value::as_u64).unwrap_or(default)
        };
        Ok(RateLimits {
            max_concurrent_jobs: get("max_concurrent_jobs", 1),
            rate_limit_per_minute: get("rate_limit_per_minute", 10),
        })
    }

    /// Current storage usage, 0.0 to 100.0.
    pub async fn storage_usage_percent(&self) -> Result<f64> {
        Ok(self.storage_quota().await?.usage_percent)
    }

    /// Whether usage sits at or above `threshold` percent.
    pub async fn is_storage_quota_warning(&self, threshold: f64) -> Result<bool> {
        Ok(self.storage_usage_percent().await? >= threshold)
    }

    /// Up to `limit` of the largest stored files. Pure truncation of the
    /// server-computed listing from one quota fetch.
    pub async fn largest_files(&self, limit: usize) -> Result<Vec<Value>> {
        let mut files = self.storage_quota().await?.largest_files;
        files.truncate(limit);
        Ok(files)
    }

    /// Storage breakdown by file type.
    pub async fn storage_breakdown(&self) -> Result<OptionsMap> {
        Ok(self.storage_quota().await?.breakdown)
    }
}
