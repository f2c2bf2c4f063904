//! # Stepwise Protocols
//!
//! Data model and collaborator traits shared by the Stepwise crates.
//! Contains only definitions - the engine, the browser driver and the
//! matching oracle live in their own crates.
//!
//! ## Core Traits
//!
//! - [`BrowserSession`] - One live page; performs primitive actions
//! - [`SessionFactory`] - Opens a fresh session for a run
//! - [`MatchOracle`] - AI-backed element matcher used as a last resort
//! - [`ArtifactCapture`] - Evidence producer for failed steps

pub mod artifact;
pub mod error;
pub mod oracle;
pub mod session;
pub mod types;

pub use artifact::{ArtifactCapture, ArtifactKind, ArtifactRef};
pub use error::{ActionError, ArtifactError, OracleError, SessionError, StepError};
pub use oracle::{MatchOracle, MatchRequest, MatchVerdict, OracleCandidate};
pub use session::{BrowserSession, SessionFactory};
pub use types::*;
