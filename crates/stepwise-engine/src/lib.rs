//! # Stepwise Engine
//!
//! Turns declarative test steps into resolved, retried, timed browser
//! actions and aggregates their outcomes into a single verdict.
//!
//! - [`ElementResolver`] - literal fast path, deterministic cascade, oracle fallback
//! - [`StepExecutor`] - bounded retry loop with per-action timeouts
//! - [`Orchestrator`] - ordered execution with the stop/continue failure policy
//! - [`TestRunner`] - session lifecycle with guaranteed teardown
//! - [`FsArtifactCapture`] - screenshots on disk for failed steps

pub mod artifacts;
pub mod assertion;
pub mod executor;
pub mod orchestrator;
pub mod policy;
pub mod resolver;
pub mod runner;
pub mod translate;

#[cfg(test)]
pub(crate) mod testing;

pub use artifacts::FsArtifactCapture;
pub use executor::{ArtifactSettings, StepExecutor};
pub use orchestrator::{Orchestrator, CANCELLED_MESSAGE};
pub use policy::ExecutionPolicy;
pub use resolver::{generate_selector, ElementResolver};
pub use runner::TestRunner;
