//! Tool catalog entries.

use serde::{Deserialize, Serialize};

use super::OptionsMap;

/// A named remote processing capability (e.g. background removal),
/// invocable with input files and options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub input_type: String,
    pub output_type: String,
    /// Subscription tier required to run this tool.
    pub required_tier: String,
    /// Whether the current account's tier can run it.
    pub accessible: bool,
    /// Tool-specific option schema; shapes vary per tool.
    #[serde(default)]
    pub options: OptionsMap,
    #[serde(default)]
    pub supports_audio: bool,
    #[serde(default)]
    pub supports_batch: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    600
}
