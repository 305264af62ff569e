//! Browser automation driver boundary.
//!
//! A driver is a stateful, UI-driving collaborator implemented outside this
//! crate (typically over a browser-control protocol). The orchestration core
//! only ever needs its cookie output and, optionally, its search-result text
//! as a fallback channel.

use std::collections::HashMap;

use async_trait::async_trait;
use zetesis_types::Result;

/// Contract for driving a real browser against the service UI.
#[async_trait]
pub trait BrowserDriver: Send {
    /// Launch or attach to the browser session.
    async fn start(&mut self) -> Result<()>;

    /// Navigate to the service homepage and wait for it to settle.
    async fn navigate_to_home(&mut self) -> Result<()>;

    /// Submit a query through the UI and return the answer text.
    async fn search(&mut self, query: &str) -> Result<String>;

    /// Session cookies currently held by the browser.
    async fn cookies(&self) -> Result<HashMap<String, String>>;

    /// Tear the session down. Must be safe to call after a failure.
    async fn close(&mut self) -> Result<()>;
}
