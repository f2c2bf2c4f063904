//! Minimal Chrome DevTools Protocol client.
//!
//! Talks to Chrome over the browser-level WebSocket and drives pages through
//! flattened target sessions. Only the commands the step engine needs are
//! wrapped: navigation, script evaluation, input dispatch and screenshots.

mod client;
mod error;
mod page;
mod protocol;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::PageSession;
pub use protocol::*;
