//! # zetsubou
//!
//! Rust SDK for the Zetsubou.life API v2: typed, ergonomic access to tools
//! execution, job polling, virtual file storage, chat, webhooks, NFT
//! generation and account introspection.
//!
//! ## Overview
//!
//! The client is a stateless request/response mapper over the remote API.
//! All HTTP plumbing lives in one transport core that attaches the API key,
//! classifies status codes into typed errors, and transparently retries
//! transient failures (5xx, timeouts, connection errors) with exponential
//! backoff. Resource accessors are thin namespaces over that core; nothing
//! is cached between calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zetsubou::{FileInput, ZetsubouClient};
//!
//! #[tokio::main]
//! async fn main() -> zetsubou::Result<()> {
//!     let client = ZetsubouClient::builder()
//!         .api_key("ztb_live_...")
//!         .build()?;
//!
//!     let job = client
//!         .tools()
//!         .execute("background-removal", vec![FileInput::path("cat.png")], None, vec![])
//!         .await?;
//!
//!     let done = client.jobs().wait_for_completion(&job.id).await?;
//!     client.jobs().save_results(&done.id, "results.zip").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`ZetsubouClient`] and its builder |
//! | [`transport`] | HTTP core: auth, status classification, retry/backoff |
//! | [`services`] | Per-resource accessors (tools, jobs, vfs, chat, ...) |
//! | [`types`] | Typed records hydrated from API responses |
//! | [`config`] | Client configuration and API key resolution |
//! | [`error`] | Error taxonomy with structured server detail |

pub mod client;
pub mod config;
pub mod error;
pub mod services;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{ZetsubouClient, ZetsubouClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, ErrorDetail};
pub use services::{FileInput, PollOptions};
pub use types::{
    Account, ChatConversation, ChatExport, ChatMessage, ExportFormat, Job, JobStatus, StorageQuota,
    Tool, VfsNode, Webhook,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
