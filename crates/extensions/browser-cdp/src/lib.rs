//! Chrome DevTools Protocol browser sessions for Stepwise.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐    WebSocket     ┌──────────────────┐
//! │  step engine     │ ◄──────────────► │  Chrome/Chromium │
//! │  (BrowserSession)│       CDP        │  (one page/run)  │
//! └──────────────────┘                  └──────────────────┘
//! ```
//!
//! [`ChromeSessionFactory`] launches Chrome with a throwaway profile (or
//! attaches to one already listening on the debug port) and hands out a
//! [`CdpBrowserSession`] per run. Element work happens through injected
//! scripts: an inventory of interactive elements for the resolver and a small
//! locator engine understanding CSS, `css=`, `id=`, `xpath=`/`//` and
//! `text="..."`.

pub mod cdp;
pub mod launcher;
mod scripts;
pub mod session;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use launcher::{find_chrome, ChromeProcess, ChromeSessionFactory};
pub use session::CdpBrowserSession;
