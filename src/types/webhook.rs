//! Webhook subscriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A push-subscription record held server-side; the client only configures
/// it. Delivery counters are maintained by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: i64,
    pub url: String,
    /// Subscribed event types, e.g. `job.completed`.
    pub events: Vec<String>,
    pub enabled: bool,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failure_count: u64,
    #[serde(default)]
    pub last_delivery_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_webhook_has_zero_counters() {
        let hook: Webhook = serde_json::from_value(serde_json::json!({
            "id": 3,
            "url": "https://example.com/hook",
            "events": ["job.completed", "job.failed"],
            "enabled": true,
            "created_at": "2025-11-02T10:00:00Z",
            "updated_at": "2025-11-02T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(hook.success_count, 0);
        assert_eq!(hook.failure_count, 0);
        assert!(hook.last_delivery_at.is_none());
    }
}
