//! # Zetesis - Conversational Search Client for Rust
//!
//! Zetesis is an unofficial client for a conversational search service with:
//! - **Async and blocking interfaces** (pick per call site, same semantics)
//! - **Streaming answers** (newline-delimited JSON fragments as they arrive)
//! - **Multi-turn conversations** (explicit handles, bounded context windows)
//! - **Cookie-profile auth** (file-backed profiles, browser-export import)
//! - **Concurrent batches** (ordered results, per-slot failure capture)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zetesis::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> zetesis::Result<()> {
//!     let client = ClientBuilder::new()
//!         .cookie("session", "your-token")
//!         .build()?;
//!
//!     let result = client.search(&SearchRequest::new("What is quantum computing?")).await?;
//!     println!("{}", result.answer);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Zetesis consists of several composable crates:
//!
//! - **zetesis-types**: Core types (requests, results, conversations, errors)
//! - **zetesis-client**: Async and blocking clients with retry and streaming
//! - **zetesis-auth**: Cookie profile storage and extraction boundaries
//! - **zetesis-automation**: Browser-driver boundary for the UI fallback
//!
//! ## Examples
//!
//! ### Multi-turn conversation
//!
//! ```rust,no_run
//! use zetesis::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> zetesis::Result<()> {
//!     let client = ClientBuilder::new()
//!         .cookie("session", "your-token")
//!         .build()?;
//!
//!     let conversation = client.start_conversation();
//!     client.search_in(&conversation, &SearchRequest::new("What is Rust?")).await?;
//!     let follow_up = client
//!         .search_in(&conversation, &SearchRequest::new("Who created it?"))
//!         .await?;
//!     println!("{}", follow_up.answer);
//!
//!     let transcript = client.export_conversation(&conversation, ExportFormat::Markdown)?;
//!     println!("{transcript}");
//!     Ok(())
//! }
//! ```
//!
//! ### Streaming
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use zetesis::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> zetesis::Result<()> {
//!     let client = ClientBuilder::new()
//!         .cookie("session", "your-token")
//!         .build()?;
//!
//!     let mut stream = client
//!         .search_stream(&SearchRequest::new("Explain ownership"))
//!         .await?;
//!     while let Some(fragment) = stream.next().await {
//!         if let Some(chunk) = fragment?.get("chunk") {
//!             print!("{chunk}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Re-export all public APIs
pub use zetesis_auth as auth;
pub use zetesis_automation as automation;
pub use zetesis_client as client;
pub use zetesis_types as types;

// Re-export commonly used types
pub use zetesis_auth::{Browser, CookieSource, CookieStore, JsonExport};
pub use zetesis_automation::{BrowserDriver, FallbackSession};
pub use zetesis_client::{blocking, AsyncClient, ClientConfig, Fragment, FragmentStream};
pub use zetesis_types::{
    AiModel, Conversation, ConversationId, Error, ExportFormat, Result, SearchMode, SearchRequest,
    SearchResult, SourceType,
};

/// High-level builder for configuring clients
pub mod builder;

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::builder::ClientBuilder;
    pub use crate::types::{
        AiModel, ExportFormat, SearchMode, SearchRequest, SearchResult, SourceType,
    };
    pub use crate::{AsyncClient, Error, Result};
}
