//! Tool catalog and execution.

use std::sync::Arc;

use serde_json::Value;

use crate::transport::HttpTransport;
use crate::types::{Job, OptionsMap, Tool};
use crate::{Error, Result};

use super::{decode, decode_field, FileInput};

/// Accessor for `/api/v2/tools` and `/api/v2/chains`.
#[derive(Clone)]
pub struct ToolsClient {
    transport: Arc<HttpTransport>,
}

impl ToolsClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// List all available tools.
    pub async fn list(&self) -> Result<Vec<Tool>> {
        let body = self.transport.get("/api/v2/tools").await?;
        decode_field(body, "tools")
    }

    /// Fetch a single tool by id.
    pub async fn get(&self, tool_id: &str) -> Result<Tool> {
        let body = self.transport.get(&format!("/api/v2/tools/{tool_id}")).await?;
        decode(body)
    }

    /// Execute a tool against one or more input files. Returns the job the
    /// server queued; use `jobs().wait_for_completion` to block on it.
    pub async fn execute(
        &self,
        tool_id: &str,
        files: Vec<FileInput>,
        options: Option<OptionsMap>,
        audio_files: Vec<FileInput>,
    ) -> Result<Job> {
        self.run(&format!("/api/v2/tools/{tool_id}/execute"), files, options, audio_files)
            .await
    }

    /// Batch variant of [`execute`](Self::execute): one job over many files.
    pub async fn batch_execute(
        &self,
        tool_id: &str,
        files: Vec<FileInput>,
        options: Option<OptionsMap>,
        audio_files: Vec<FileInput>,
    ) -> Result<Job> {
        self.run(&format!("/api/v2/tools/{tool_id}/batch"), files, options, audio_files)
            .await
    }

    async fn run(
        &self,
        path: &str,
        files: Vec<FileInput>,
        options: Option<OptionsMap>,
        audio_files: Vec<FileInput>,
    ) -> Result<Job> {
        if files.is_empty() {
            return Err(Error::Configuration("at least one input file is required".into()));
        }

        // Positional part names let the server disambiguate multiple uploads
        // in one request.
        let mut attachments = Vec::with_capacity(files.len() + audio_files.len());
        for (i, file) in files.into_iter().enumerate() {
            attachments.push(file.into_attachment(format!("file_{i}")).await?);
        }
        for (i, audio) in audio_files.into_iter().enumerate() {
            attachments.push(audio.into_attachment(format!("audio_{i}")).await?);
        }

        let mut fields = Vec::new();
        if let Some(options) = options {
            fields.push(("options".to_string(), serde_json::to_string(&options)?));
        }

        let body = self.transport.post_multipart(path, fields, attachments).await?;
        decode_field(body, "job")
    }

    /// Create a tool chain for automated multi-step processing.
    pub async fn create_chain(
        &self,
        name: &str,
        steps: Vec<Value>,
        description: Option<&str>,
    ) -> Result<Value> {
        let mut payload = serde_json::json!({
            "name": name,
            "steps": steps,
        });
        if let Some(description) = description {
            payload["description"] = Value::String(description.to_string());
        }
        self.transport.post("/api/v2/chains", payload).await
    }

    pub async fn list_chains(&self) -> Result<Vec<Value>> {
        let body = self.transport.get("/api/v2/chains").await?;
        decode_field(body, "chains")
    }

    pub async fn get_chain(&self, chain_id: i64) -> Result<Value> {
        self.transport.get(&format!("/api/v2/chains/{chain_id}")).await
    }
}
