//! # Types Module
//!
//! Typed records hydrated from API v2 JSON responses.
//!
//! All records are immutable value types: every field is assigned once from
//! the server response and never recomputed. Accessors returning "updated"
//! objects hand back a fresh record. Key-spelling variants the server emits
//! (`id`/`job_id`, `tool_id`/`tool`, ...) are normalized here via serde
//! aliases, in one place per entity, so no accessor carries inline fallbacks.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Tool`] | Read-only catalog entry for a remote processing capability |
//! | [`Job`] | One asynchronous tool invocation, observed via polling |
//! | [`VfsNode`] | File or folder in the server-side virtual file system |
//! | [`ChatConversation`] / [`ChatMessage`] | Chat aggregate and its messages |
//! | [`Webhook`] | Server-side push-subscription record |
//! | [`Account`] / [`StorageQuota`] | Read-mostly account snapshots |
//! | [`NftProject`] / [`NftGeneration`] | NFT generator resources |

pub mod account;
pub mod chat;
pub mod job;
pub mod nft;
pub mod tool;
pub mod vfs;
pub mod webhook;

pub use account::{Account, ApiKey, StorageQuota};
pub use chat::{ChatConversation, ChatExport, ChatMessage, ExportFormat, MessageRole};
pub use job::{Job, JobProgress, JobStatus};
pub use nft::{NftGeneration, NftLimits, NftProject};
pub use tool::Tool;
pub use vfs::{NodeKind, VfsNode};
pub use webhook::Webhook;

/// Arbitrary per-tool/per-project option maps. The remote API's option
/// shapes vary per tool and are not enumerable statically, so they stay a
/// permissive JSON map end to end.
pub type OptionsMap = serde_json::Map<String, serde_json::Value>;

pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    /// Accept either a JSON string or a number for identifier fields; some
    /// NFT endpoints emit numeric ids where others emit strings.
    pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IdRepr {
            Str(String),
            Num(i64),
        }
        Ok(match IdRepr::deserialize(deserializer)? {
            IdRepr::Str(s) => s,
            IdRepr::Num(n) => n.to_string(),
        })
    }
}
