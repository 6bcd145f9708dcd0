//! Virtual file system nodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A file or folder in the server-side VFS tree. Nodes form a tree via
/// `parent_id`; `None` means the node sits at the root. Cycles are
/// impossible by construction (server-enforced).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VfsNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub size_bytes: u64,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_encrypted: bool,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl VfsNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_parent_is_root() {
        let node: VfsNode = serde_json::from_value(serde_json::json!({
            "id": "9f0c",
            "name": "photos",
            "type": "folder",
            "size_bytes": 0,
            "created_at": "2025-11-02T10:00:00Z",
            "updated_at": "2025-11-02T10:00:00Z",
            "parent_id": null
        }))
        .unwrap();
        assert!(node.is_root());
        assert!(node.is_folder());
        assert!(!node.is_encrypted);
    }

    #[test]
    fn absent_parent_is_also_root() {
        let node: VfsNode = serde_json::from_value(serde_json::json!({
            "id": "9f0d",
            "name": "cat.png",
            "type": "file",
            "size_bytes": 4096,
            "mime_type": "image/png",
            "created_at": "2025-11-02T10:00:00Z",
            "updated_at": "2025-11-02T10:05:00Z"
        }))
        .unwrap();
        assert!(node.is_root());
        assert!(node.is_file());
        assert_eq!(node.mime_type.as_deref(), Some("image/png"));
    }
}
