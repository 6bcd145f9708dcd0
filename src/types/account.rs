//! Account, storage quota and API key records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OptionsMap;

/// Read-mostly snapshot of the authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub tier: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub subscription: OptionsMap,
    #[serde(default)]
    pub usage: OptionsMap,
    #[serde(default)]
    pub features: OptionsMap,
}

/// Storage quota snapshot, including the server-computed breakdown and
/// largest-files listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageQuota {
    pub tier: String,
    pub quota_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub usage_percent: f64,
    pub file_count: u64,
    pub folder_count: u64,
    #[serde(default)]
    pub breakdown: OptionsMap,
    #[serde(default)]
    pub largest_files: Vec<serde_json::Value>,
}

/// An issued API key, as returned by the key-introspection endpoint. The
/// secret itself is only present in the creation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_maps_default_empty() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "user_id": 42,
            "username": "kaori",
            "email": "kaori@example.com",
            "tier": "pro",
            "created_at": "2025-01-15T08:00:00Z"
        }))
        .unwrap();
        assert!(account.subscription.is_empty());
        assert!(account.usage.is_empty());
        assert!(account.features.is_empty());
    }

    #[test]
    fn quota_hydrates_breakdown() {
        let quota: StorageQuota = serde_json::from_value(serde_json::json!({
            "tier": "pro",
            "quota_bytes": 10737418240u64,
            "used_bytes": 1073741824u64,
            "available_bytes": 9663676416u64,
            "usage_percent": 10.0,
            "file_count": 120,
            "folder_count": 8,
            "breakdown": {"image": 900000000},
            "largest_files": [{"name": "video.mp4", "size_bytes": 500000000}]
        }))
        .unwrap();
        assert_eq!(quota.largest_files.len(), 1);
        assert!(quota.breakdown.contains_key("image"));
    }
}
