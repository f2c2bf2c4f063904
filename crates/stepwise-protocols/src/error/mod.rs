//! Error types for the Stepwise protocol layer.

mod action;
mod artifact;
mod oracle;
mod session;
mod step;

pub use action::*;
pub use artifact::*;
pub use oracle::*;
pub use session::*;
pub use step::*;
