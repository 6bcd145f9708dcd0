//! NFT generator resources.
//!
//! The NFT surface signals failure through a `{success, error}` response
//! envelope rather than HTTP status codes; the envelope check lives in the
//! accessor, so these records only describe the success shapes. Timestamps
//! on this surface are passed through as the server sends them (the
//! endpoint family is not consistent about formats).

use serde::{Deserialize, Serialize};

use super::OptionsMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftProject {
    #[serde(deserialize_with = "super::de::id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub collection_config: OptionsMap,
    #[serde(default)]
    pub generation_config: OptionsMap,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub layers: Vec<serde_json::Value>,
    #[serde(default)]
    pub layer_count: u64,
    #[serde(default)]
    pub generations: Vec<serde_json::Value>,
    #[serde(default)]
    pub generation_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftGeneration {
    #[serde(deserialize_with = "super::de::id_string")]
    pub id: String,
    #[serde(default)]
    pub project_id: Option<serde_json::Value>,
    #[serde(default)]
    pub total_pieces: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub vfs_build_folder_id: Option<String>,
    #[serde(default)]
    pub vfs_images_folder_id: Option<String>,
    #[serde(default)]
    pub vfs_metadata_folder_id: Option<String>,
}

/// Per-tier NFT limits and current usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftLimits {
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub limits: OptionsMap,
    #[serde(default)]
    pub usage: OptionsMap,
}
