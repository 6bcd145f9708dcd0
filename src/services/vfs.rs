//! Virtual file system operations.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::transport::HttpTransport;
use crate::types::{NodeKind, VfsNode};
use crate::Result;

use super::{decode_field, success_flag, FileInput};

/// Listing filter for `/api/v2/vfs/nodes`.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    /// Restrict to children of this folder; `None` lists the root level.
    pub parent_id: Option<String>,
    pub kind: Option<NodeKind>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Accessor for `/api/v2/vfs`.
#[derive(Clone)]
pub struct VfsClient {
    transport: Arc<HttpTransport>,
}

impl VfsClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// List nodes. The server filters by `parent_id` exactly, so listing a
    /// folder only returns its direct children.
    pub async fn list_nodes(&self, filter: NodeFilter) -> Result<Vec<VfsNode>> {
        let mut query = vec![
            ("limit".to_string(), filter.limit.unwrap_or(100).to_string()),
            ("offset".to_string(), filter.offset.unwrap_or(0).to_string()),
        ];
        if let Some(parent_id) = filter.parent_id {
            query.push(("parent_id".to_string(), parent_id));
        }
        if let Some(kind) = filter.kind {
            let kind = match kind {
                NodeKind::File => "file",
                NodeKind::Folder => "folder",
            };
            query.push(("type".to_string(), kind.to_string()));
        }
        let body = self.transport.get_with("/api/v2/vfs/nodes", &query).await?;
        decode_field(body, "nodes")
    }

    pub async fn get_node(&self, node_id: &str) -> Result<VfsNode> {
        let body = self.transport.get(&format!("/api/v2/vfs/nodes/{node_id}")).await?;
        decode_field(body, "node")
    }

    /// Upload one file into the VFS, optionally under a parent folder and
    /// optionally encrypted at rest.
    pub async fn upload(
        &self,
        file: FileInput,
        parent_id: Option<&str>,
        encrypt: bool,
    ) -> Result<VfsNode> {
        let attachment = file.into_attachment("file".to_string()).await?;
        let mut fields = vec![("encrypt".to_string(), encrypt.to_string())];
        if let Some(parent_id) = parent_id {
            fields.push(("parent_id".to_string(), parent_id.to_string()));
        }
        let body = self
            .transport
            .post_multipart("/api/v2/vfs/upload", fields, vec![attachment])
            .await?;
        decode_field(body, "node")
    }

    /// Download a file's content into memory.
    pub async fn download(&self, node_id: &str) -> Result<Bytes> {
        self.transport
            .download(&format!("/api/v2/vfs/nodes/{node_id}/download"), &[])
            .await
    }

    /// Stream a file's content straight to `path`.
    pub async fn save(&self, node_id: &str, path: impl AsRef<Path>) -> Result<()> {
        self.transport
            .download_to(&format!("/api/v2/vfs/nodes/{node_id}/download"), &[], path.as_ref())
            .await
    }

    pub async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<VfsNode> {
        let mut payload = serde_json::json!({ "name": name });
        if let Some(parent_id) = parent_id {
            payload["parent_id"] = Value::String(parent_id.to_string());
        }
        let body = self.transport.post("/api/v2/vfs/folders", payload).await?;
        decode_field(body, "folder")
    }

    /// Rename and/or move a node. Returns the fresh record; the old one is
    /// not mutated.
    pub async fn update_node(
        &self,
        node_id: &str,
        name: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<VfsNode> {
        let mut payload = serde_json::Map::new();
        if let Some(name) = name {
            payload.insert("name".to_string(), Value::String(name.to_string()));
        }
        if let Some(parent_id) = parent_id {
            payload.insert("parent_id".to_string(), Value::String(parent_id.to_string()));
        }
        let body = self
            .transport
            .patch(&format!("/api/v2/vfs/nodes/{node_id}"), Value::Object(payload))
            .await?;
        decode_field(body, "node")
    }

    /// Soft-delete a node.
    pub async fn delete_node(&self, node_id: &str) -> Result<bool> {
        let body = self.transport.delete(&format!("/api/v2/vfs/nodes/{node_id}")).await?;
        Ok(success_flag(&body))
    }

    /// Direct children of a folder.
    pub async fn folder_contents(&self, folder_id: &str) -> Result<Vec<VfsNode>> {
        self.list_nodes(NodeFilter {
            parent_id: Some(folder_id.to_string()),
            ..NodeFilter::default()
        })
        .await
    }

    /// Client-side file search over one listing: case-insensitive name
    /// substring and/or exact MIME type. No extra network round-trips.
    pub async fn search_files(
        &self,
        name_pattern: Option<&str>,
        mime_type: Option<&str>,
        limit: u32,
    ) -> Result<Vec<VfsNode>> {
        let nodes = self
            .list_nodes(NodeFilter {
                limit: Some(limit),
                ..NodeFilter::default()
            })
            .await?;

        let pattern = name_pattern.map(str::to_lowercase);
        Ok(nodes
            .into_iter()
            .filter(|node| node.is_file())
            .filter(|node| {
                pattern
                    .as_deref()
                    .map_or(true, |p| node.name.to_lowercase().contains(p))
            })
            .filter(|node| {
                mime_type.map_or(true, |m| node.mime_type.as_deref() == Some(m))
            })
            .collect())
    }
}
