//! Evidence capture for failed steps.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::session::BrowserSession;

/// Opaque reference (path or URI) to a captured artifact.
pub type ArtifactRef = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Screenshot,
    Video,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactKind::Screenshot => "screenshot",
            ArtifactKind::Video => "video",
        })
    }
}

/// Produces evidence keyed by step identity.
///
/// `Ok(None)` means there was nothing to capture. Errors are logged and
/// swallowed by the engine; they never fail a step.
#[async_trait]
pub trait ArtifactCapture: Send + Sync {
    async fn capture(
        &self,
        session: &dyn BrowserSession,
        step_number: u32,
        kind: ArtifactKind,
    ) -> Result<Option<ArtifactRef>, ArtifactError>;
}
