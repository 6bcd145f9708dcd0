//! Resource accessors.
//!
//! Each accessor is a thin namespace bound to the client's one
//! [`HttpTransport`](crate::transport::HttpTransport): it builds the endpoint
//! path/params/body, delegates to the transport, and wraps the JSON body into
//! a typed record. Transport failures propagate unchanged; only the NFT and
//! chat-export surfaces add the `{success, error}` envelope check, and the
//! job polling loop re-raises terminal job states.

pub mod account;
pub mod chat;
pub mod graphql;
pub mod jobs;
pub mod nft;
pub mod poll;
pub mod tools;
pub mod vfs;
pub mod webhooks;

pub use account::{AccountClient, RateLimits, TierInfo};
pub use chat::ChatClient;
pub use graphql::GraphqlClient;
pub use jobs::{JobFilter, JobsClient};
pub use nft::{LayerOptions, NftClient, NftProjectUpdate};
pub use poll::PollOptions;
pub use tools::ToolsClient;
pub use vfs::{NodeFilter, VfsClient};
pub use webhooks::{WebhookUpdate, WebhooksClient};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::transport::Attachment;
use crate::{Error, ErrorDetail, Result};

/// A file to upload: either a filesystem path (read fully into memory and
/// paired with its base filename) or an already-materialized byte buffer.
#[derive(Debug, Clone)]
pub enum FileInput {
    Path(std::path::PathBuf),
    Bytes { name: String, data: Vec<u8> },
}

impl FileInput {
    pub fn path(p: impl Into<std::path::PathBuf>) -> Self {
        FileInput::Path(p.into())
    }

    pub fn bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        FileInput::Bytes {
            name: name.into(),
            data,
        }
    }

    /// Materialize into a named multipart attachment under `field`.
    pub(crate) async fn into_attachment(self, field: String) -> Result<Attachment> {
        match self {
            FileInput::Path(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "file".to_string());
                let data = tokio::fs::read(&path).await?;
                Ok(Attachment::new(field, name, data))
            }
            FileInput::Bytes { name, data } => Ok(Attachment::new(field, name, data)),
        }
    }
}

/// Decode a full response body into `T`.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Decode `value[key]` into `T`, failing with a structured error when the
/// response does not carry the expected field.
pub(crate) fn decode_field<T: DeserializeOwned>(mut value: Value, key: &str) -> Result<T> {
    let inner = value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| Error::api(format!("response missing '{key}' field")))?;
    decode(inner)
}

/// `data.get("success", false)`-style flag used by delete/cancel/test
/// endpoints that answer with a bare `{"success": bool}`.
pub(crate) fn success_flag(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Enforce the `{success, error}` envelope convention: anything other than
/// `success: true` raises, carrying the embedded error string, regardless of
/// the HTTP status the body arrived under.
pub(crate) fn check_envelope(value: &Value, fallback: &str) -> Result<()> {
    if value.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    let message = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or(fallback);
    Err(Error::Api(
        ErrorDetail::new(message)
            .with_code("ENVELOPE_ERROR")
            .with_payload(value.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_accepts_only_explicit_success() {
        assert!(check_envelope(&serde_json::json!({"success": true}), "x").is_ok());
        assert!(check_envelope(&serde_json::json!({"success": false, "error": "nope"}), "x").is_err());
        // Missing flag counts as failure too.
        assert!(check_envelope(&serde_json::json!({"projects": []}), "x").is_err());
    }

    #[test]
    fn envelope_error_carries_embedded_message() {
        let err = check_envelope(
            &serde_json::json!({"success": false, "error": "layer limit reached"}),
            "fallback",
        )
        .unwrap_err();
        assert_eq!(err.detail().unwrap().message, "layer limit reached");
    }

    #[test]
    fn decode_field_reports_missing_key() {
        let err = decode_field::<Vec<String>>(serde_json::json!({"other": []}), "tools").unwrap_err();
        assert!(err.to_string().contains("tools"));
    }
}
