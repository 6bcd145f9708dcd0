//! Webhook management.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::transport::HttpTransport;
use crate::types::Webhook;
use crate::Result;

use super::{decode_field, success_flag};

/// Partial update for [`WebhooksClient::update`]; unset fields are left
/// untouched server-side.
#[derive(Debug, Clone, Default)]
pub struct WebhookUpdate {
    pub url: Option<String>,
    pub events: Option<Vec<String>>,
    pub secret: Option<String>,
    pub enabled: Option<bool>,
}

/// Accessor for `/api/v2/webhooks`.
#[derive(Clone)]
pub struct WebhooksClient {
    transport: Arc<HttpTransport>,
}

impl WebhooksClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Webhook>> {
        let body = self.transport.get("/api/v2/webhooks").await?;
        decode_field(body, "webhooks")
    }

    /// Register a webhook for the given event types. `secret` enables
    /// signature verification on deliveries.
    pub async fn create(
        &self,
        url: &str,
        events: Vec<String>,
        secret: Option<&str>,
    ) -> Result<Webhook> {
        let mut payload = serde_json::json!({
            "url": url,
            "events": events,
        });
        if let Some(secret) = secret {
            payload["secret"] = Value::String(secret.to_string());
        }
        let body = self.transport.post("/api/v2/webhooks", payload).await?;
        decode_field(body, "webhook")
    }

    pub async fn get(&self, webhook_id: i64) -> Result<Webhook> {
        let body = self.transport.get(&format!("/api/v2/webhooks/{webhook_id}")).await?;
        decode_field(body, "webhook")
    }

    pub async fn update(&self, webhook_id: i64, update: WebhookUpdate) -> Result<Webhook> {
        let mut payload = serde_json::Map::new();
        if let Some(url) = update.url {
            payload.insert("url".to_string(), Value::String(url));
        }
        if let Some(events) = update.events {
            payload.insert("events".to_string(), serde_json::to_value(events)?);
        }
        if let Some(secret) = update.secret {
            payload.insert("secret".to_string(), Value::String(secret));
        }
        if let Some(enabled) = update.enabled {
            payload.insert("enabled".to_string(), Value::Bool(enabled));
        }
        let body = self
            .transport
            .put(&format!("/api/v2/webhooks/{webhook_id}"), Value::Object(payload))
            .await?;
        decode_field(body, "webhook")
    }

    pub async fn delete(&self, webhook_id: i64) -> Result<bool> {
        let body = self.transport.delete(&format!("/api/v2/webhooks/{webhook_id}")).await?;
        Ok(success_flag(&body))
    }

    /// Ask the server to deliver a test event.
    pub async fn test(&self, webhook_id: i64) -> Result<bool> {
        let body = self
            .transport
            .post_empty(&format!("/api/v2/webhooks/{webhook_id}/test"))
            .await?;
        Ok(success_flag(&body))
    }

    /// Delivery statistics over the trailing `days`-day window.
    pub async fn stats(&self, webhook_id: i64, days: u32) -> Result<Value> {
        let query = vec![("days".to_string(), days.to_string())];
        self.transport
            .get_with(&format!("/api/v2/webhooks/{webhook_id}/stats"), &query)
            .await
    }

    /// Event types the server can deliver, keyed by type with a description.
    pub async fn available_events(&self) -> Result<HashMap<String, String>> {
        let body = self.transport.get("/api/v2/webhooks/events").await?;
        decode_field(body, "events")
    }

    /// Webhook subscribed to job terminal events.
    pub async fn create_job_webhook(&self, url: &str, secret: Option<&str>) -> Result<Webhook> {
        let events = ["job.completed", "job.failed", "job.cancelled"]
            .map(String::from)
            .to_vec();
        self.create(url, events, secret).await
    }

    /// Webhook subscribed to file transfer events.
    pub async fn create_file_webhook(&self, url: &str, secret: Option<&str>) -> Result<Webhook> {
        let events = ["file.uploaded", "file.downloaded"].map(String::from).to_vec();
        self.create(url, events, secret).await
    }

    /// Webhook subscribed to storage quota events.
    pub async fn create_storage_webhook(&self, url: &str, secret: Option<&str>) -> Result<Webhook> {
        let events = ["storage.quota_warning", "storage.quota_exceeded"]
            .map(String::from)
            .to_vec();
        self.create(url, events, secret).await
    }

    /// Webhook subscribed to every event type the server advertises.
    pub async fn create_all_events_webhook(&self, url: &str, secret: Option<&str>) -> Result<Webhook> {
        let events = self.available_events().await?.into_keys().collect();
        self.create(url, events, secret).await
    }
}
