//! Chat conversations, messages and exports.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::transport::HttpTransport;
use crate::types::{ChatConversation, ChatExport, ChatMessage, ExportFormat};
use crate::{Error, Result};

use super::{check_envelope, decode_field, success_flag};

/// Accessor for `/api/v2/chat`.
#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<HttpTransport>,
}

impl ChatClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn list_conversations(&self, limit: u32, offset: u32) -> Result<Vec<ChatConversation>> {
        let query = vec![
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        let body = self.transport.get_with("/api/v2/chat/conversations", &query).await?;
        decode_field(body, "conversations")
    }

    pub async fn create_conversation(
        &self,
        title: &str,
        model: &str,
        system_prompt: Option<&str>,
    ) -> Result<ChatConversation> {
        let mut payload = serde_json::json!({
            "title": title,
            "model": model,
        });
        if let Some(system_prompt) = system_prompt {
            payload["system_prompt"] = Value::String(system_prompt.to_string());
        }
        let body = self.transport.post("/api/v2/chat/conversations", payload).await?;
        decode_field(body, "conversation")
    }

    /// Fetch one conversation. The API has no single-conversation endpoint,
    /// so this scans the listing.
    pub async fn get_conversation(&self, conversation_id: i64) -> Result<ChatConversation> {
        self.list_conversations(1000, 0)
            .await?
            .into_iter()
            .find(|conv| conv.id == conversation_id)
            .ok_or_else(|| Error::api(format!("conversation {conversation_id} not found")))
    }

    pub async fn delete_conversation(&self, conversation_id: i64) -> Result<bool> {
        let body = self
            .transport
            .delete(&format!("/api/v2/chat/conversations/{conversation_id}"))
            .await?;
        Ok(success_flag(&body))
    }

    /// All messages of a conversation, ordered by timestamp.
    pub async fn messages(&self, conversation_id: i64) -> Result<Vec<ChatMessage>> {
        let body = self
            .transport
            .get(&format!("/api/v2/chat/conversations/{conversation_id}/messages"))
            .await?;
        decode_field(body, "messages")
    }

    pub async fn send_message(&self, conversation_id: i64, content: &str) -> Result<ChatMessage> {
        let body = self
            .transport
            .post(
                &format!("/api/v2/chat/conversations/{conversation_id}/messages"),
                serde_json::json!({ "content": content }),
            )
            .await?;
        decode_field(body, "message")
    }

    /// Fetch a conversation export. This is a pure fetch: nothing touches
    /// the filesystem. Use [`save_export`](Self::save_export) (or
    /// [`ChatExport::save`]) to persist.
    pub async fn export(&self, conversation_id: i64, format: ExportFormat) -> Result<ChatExport> {
        let query = vec![("format".to_string(), format.as_param().to_string())];
        let resp = self
            .transport
            .get_raw(&format!("/api/v2/chat/conversations/{conversation_id}/export"), &query)
            .await?;
        let bytes = resp.into_bytes();

        // JSON exports share the NFT-style envelope; binary/text formats
        // signal failure via status codes only.
        if format == ExportFormat::Json {
            let value: Value = serde_json::from_slice(&bytes)?;
            if value.get("success").and_then(Value::as_bool) == Some(false) {
                check_envelope(&value, "chat export failed")?;
            }
        }

        Ok(ChatExport { format, bytes })
    }

    /// Fetch an export and write it to `path`, verbatim.
    pub async fn save_export(
        &self,
        conversation_id: i64,
        format: ExportFormat,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        self.export(conversation_id, format).await?.save(path).await
    }

    /// Models the chat endpoint currently accepts.
    pub fn available_models(&self) -> Vec<&'static str> {
        vec!["llama3.2", "qwen2.5-vl", "glm-4.6:cloud", "auto"]
    }

    /// Create a conversation and send its first message in one call.
    pub async fn create_and_send(
        &self,
        title: &str,
        content: &str,
        model: &str,
        system_prompt: Option<&str>,
    ) -> Result<(ChatConversation, ChatMessage)> {
        let conversation = self.create_conversation(title, model, system_prompt).await?;
        let message = self.send_message(conversation.id, content).await?;
        Ok((conversation, message))
    }
}
