//! NFT project, layer and generation management.
//!
//! This endpoint family reports failure through a `{success, error}` body
//! envelope, sometimes under HTTP 200; every response here passes
//! [`check_envelope`] before any field is read.

use std::sync::Arc;

use serde_json::Value;

use crate::transport::HttpTransport;
use crate::types::{NftGeneration, NftLimits, NftProject, OptionsMap};
use crate::Result;

use super::{check_envelope, decode, decode_field};

/// Partial update for [`NftClient::update_project`].
#[derive(Debug, Clone, Default)]
pub struct NftProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub collection_config: Option<OptionsMap>,
    pub generation_config: Option<OptionsMap>,
    pub is_archived: Option<bool>,
}

/// Layer creation knobs; the server auto-assigns `order_index` when unset.
#[derive(Debug, Clone)]
pub struct LayerOptions {
    pub order_index: Option<u32>,
    pub is_required: bool,
    pub blend_mode: String,
    pub opacity: f64,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            order_index: None,
            is_required: true,
            blend_mode: "source-over".to_string(),
            opacity: 1.0,
        }
    }
}

/// Accessor for `/api/v2/nft`.
#[derive(Clone)]
pub struct NftClient {
    transport: Arc<HttpTransport>,
}

impl NftClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn list_projects(&self, include_archived: bool) -> Result<Vec<NftProject>> {
        let query = vec![("include_archived".to_string(), include_archived.to_string())];
        let body = self.transport.get_with("/api/v2/nft/projects", &query).await?;
        check_envelope(&body, "failed to list projects")?;
        decode_field(body, "projects")
    }

    pub async fn get_project(&self, project_id: &str) -> Result<NftProject> {
        let body = self.transport.get(&format!("/api/v2/nft/projects/{project_id}")).await?;
        check_envelope(&body, "failed to get project")?;
        decode_field(body, "project")
    }

    /// Create a project, optionally with its initial layers in the same
    /// request.
    pub async fn create_project(
        &self,
        name: &str,
        collection_config: OptionsMap,
        description: Option<&str>,
        generation_config: Option<OptionsMap>,
        layers: Option<Vec<Value>>,
    ) -> Result<NftProject> {
        let mut payload = serde_json::json!({
            "name": name,
            "collection_config": collection_config,
        });
        if let Some(description) = description {
            payload["description"] = Value::String(description.to_string());
        }
        if let Some(generation_config) = generation_config {
            payload["generation_config"] = Value::Object(generation_config);
        }
        if let Some(layers) = layers {
            payload["layers"] = Value::Array(layers);
        }
        let body = self.transport.post("/api/v2/nft/projects", payload).await?;
        check_envelope(&body, "failed to create project")?;
        decode_field(body, "project")
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        update: NftProjectUpdate,
    ) -> Result<NftProject> {
        let mut payload = serde_json::Map::new();
        if let Some(name) = update.name {
            payload.insert("name".to_string(), Value::String(name));
        }
        if let Some(description) = update.description {
            payload.insert("description".to_string(), Value::String(description));
        }
        if let Some(collection_config) = update.collection_config {
            payload.insert("collection_config".to_string(), Value::Object(collection_config));
        }
        if let Some(generation_config) = update.generation_config {
            payload.insert("generation_config".to_string(), Value::Object(generation_config));
        }
        if let Some(is_archived) = update.is_archived {
            payload.insert("is_archived".to_string(), Value::Bool(is_archived));
        }
        let body = self
            .transport
            .patch(&format!("/api/v2/nft/projects/{project_id}"), Value::Object(payload))
            .await?;
        check_envelope(&body, "failed to update project")?;
        decode_field(body, "project")
    }

    /// Archive a project, or delete it permanently when `permanent` is set.
    pub async fn delete_project(&self, project_id: &str, permanent: bool) -> Result<()> {
        let query = vec![("permanent".to_string(), permanent.to_string())];
        let body = self
            .transport
            .delete_with(&format!("/api/v2/nft/projects/{project_id}"), &query)
            .await?;
        check_envelope(&body, "failed to delete project")
    }

    pub async fn list_layers(&self, project_id: &str, include_traits: bool) -> Result<Vec<Value>> {
        let query = vec![("include_traits".to_string(), include_traits.to_string())];
        let body = self
            .transport
            .get_with(&format!("/api/v2/nft/projects/{project_id}/layers"), &query)
            .await?;
        check_envelope(&body, "failed to list layers")?;
        decode_field(body, "layers")
    }

    pub async fn create_layer(
        &self,
        project_id: &str,
        name: &str,
        options: LayerOptions,
    ) -> Result<Value> {
        let mut payload = serde_json::json!({
            "name": name,
            "is_required": options.is_required,
            "blend_mode": options.blend_mode,
            "opacity": options.opacity,
        });
        if let Some(order_index) = options.order_index {
            payload["order_index"] = Value::from(order_index);
        }
        let body = self
            .transport
            .post(&format!("/api/v2/nft/projects/{project_id}/layers"), payload)
            .await?;
        check_envelope(&body, "failed to create layer")?;
        decode_field(body, "layer")
    }

    /// Kick off a generation run of `total_pieces` NFTs.
    pub async fn create_generation(
        &self,
        project_id: &str,
        total_pieces: u64,
        config_overrides: Option<OptionsMap>,
    ) -> Result<NftGeneration> {
        let mut payload = serde_json::json!({ "total_pieces": total_pieces });
        if let Some(config_overrides) = config_overrides {
            payload["config_overrides"] = Value::Object(config_overrides);
        }
        let body = self
            .transport
            .post(&format!("/api/v2/nft/projects/{project_id}/generate"), payload)
            .await?;
        check_envelope(&body, "failed to create generation")?;
        decode_field(body, "generation")
    }

    pub async fn get_generation(&self, generation_id: &str) -> Result<NftGeneration> {
        let body = self
            .transport
            .get(&format!("/api/v2/nft/generations/{generation_id}"))
            .await?;
        check_envelope(&body, "failed to get generation")?;
        decode_field(body, "generation")
    }

    pub async fn list_generations(&self, project_id: &str) -> Result<Vec<NftGeneration>> {
        let body = self
            .transport
            .get(&format!("/api/v2/nft/projects/{project_id}/generations"))
            .await?;
        check_envelope(&body, "failed to list generations")?;
        decode_field(body, "generations")
    }

    /// The account's NFT tier, limits and current usage.
    pub async fn limits(&self) -> Result<NftLimits> {
        let body = self.transport.get("/api/v2/nft/limits").await?;
        check_envelope(&body, "failed to get limits")?;
        decode(body)
    }
}
