//! Chat conversations and messages.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The owning aggregate for a message thread. Messages are fetched
/// per-conversation and ordered by timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConversation {
    pub id: i64,
    pub title: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: u64,
    #[serde(default)]
    pub last_message: Option<ChatMessage>,
}

/// Export formats the conversation-export endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Html,
    Pdf,
}

impl ExportFormat {
    /// Query-parameter value the endpoint expects.
    pub fn as_param(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, ExportFormat::Html | ExportFormat::Pdf)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(crate::Error::Configuration(format!(
                "unknown export format '{other}' (expected json, md, html or pdf)"
            ))),
        }
    }
}

/// A fetched conversation export: the raw body plus the format it was
/// requested in. Persisting is a separate step ([`save`](ChatExport::save)
/// or `chat().save_export(...)`), never a side effect of the fetch.
#[derive(Debug, Clone)]
pub struct ChatExport {
    pub format: ExportFormat,
    pub bytes: Bytes,
}

impl ChatExport {
    /// Decode a JSON-format export.
    pub fn json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.bytes)?)
    }

    /// View a text-format export (json/markdown) as UTF-8.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Write the export bytes to `path`, verbatim.
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        tokio::fs::write(path, &self.bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_without_last_message() {
        let conv: ChatConversation = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Kitchen renovation",
            "model": "llama3.2",
            "created_at": "2025-11-02T10:00:00Z",
            "updated_at": "2025-11-02T10:30:00Z",
            "message_count": 4
        }))
        .unwrap();
        assert!(conv.last_message.is_none());
    }

    #[test]
    fn export_format_param_round_trip() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!(ExportFormat::Markdown.as_param(), "md");
        assert!("xlsx".parse::<ExportFormat>().is_err());
        assert!(ExportFormat::Pdf.is_binary());
        assert!(!ExportFormat::Json.is_binary());
    }
}
