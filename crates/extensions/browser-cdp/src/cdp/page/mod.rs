//! CDP session attached to a single page.

mod core;
mod input;
mod navigation;

pub use self::core::PageSession;
