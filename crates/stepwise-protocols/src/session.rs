//! Browser session traits.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ActionError, SessionError};
use crate::types::{BrowserAction, PageSnapshot};

/// One live browser page, owned by a single run.
///
/// Implementations are driven strictly sequentially: the engine never issues
/// two calls on the same session concurrently.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Identifier used in logs.
    fn id(&self) -> &str;

    /// Capture a fresh inventory of interactive elements.
    async fn snapshot(&self) -> Result<PageSnapshot, ActionError>;

    /// Perform one action, auto-waiting for its element up to `timeout`.
    async fn perform(&self, action: &BrowserAction, timeout: Duration) -> Result<(), ActionError>;

    /// Capture the viewport as PNG bytes.
    async fn screenshot(&self) -> Result<Vec<u8>, ActionError>;

    /// Path of the session recording, when the session records video.
    fn video_path(&self) -> Option<PathBuf> {
        None
    }

    /// Release the page and any process behind it.
    async fn close(&self) -> Result<(), SessionError>;
}

/// Opens one session per run.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError>;
}
