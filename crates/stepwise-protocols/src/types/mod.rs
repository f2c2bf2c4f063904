//! Data model shared across the Stepwise crates.

mod action;
mod resolution;
mod result;
mod snapshot;
mod step;

pub use action::*;
pub use resolution::*;
pub use result::*;
pub use snapshot::*;
pub use step::*;
