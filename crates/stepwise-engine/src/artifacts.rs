//! Filesystem-backed artifact capture.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use stepwise_protocols::{ArtifactCapture, ArtifactError, ArtifactKind, ArtifactRef, BrowserSession};

/// Writes screenshots under a directory as `step-{NN}-{kind}-{timestamp}.png`.
pub struct FsArtifactCapture {
    directory: PathBuf,
}

impl FsArtifactCapture {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    pub(crate) fn artifact_path(&self, step_number: u32, kind: ArtifactKind) -> PathBuf {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
        self.directory
            .join(format!("step-{:02}-{}-{}.png", step_number, kind, timestamp))
    }
}

#[async_trait]
impl ArtifactCapture for FsArtifactCapture {
    async fn capture(
        &self,
        session: &dyn BrowserSession,
        step_number: u32,
        kind: ArtifactKind,
    ) -> Result<Option<ArtifactRef>, ArtifactError> {
        match kind {
            ArtifactKind::Screenshot => {
                let png = session
                    .screenshot()
                    .await
                    .map_err(|e| ArtifactError::Capture(e.to_string()))?;
                if png.is_empty() {
                    return Ok(None);
                }

                tokio::fs::create_dir_all(&self.directory).await?;
                let path = self.artifact_path(step_number, kind);
                tokio::fs::write(&path, png).await?;
                debug!("Saved step {} screenshot to {:?}", step_number, path);
                Ok(Some(path.display().to_string()))
            }
            ArtifactKind::Video => Ok(session.video_path().map(|p| p.display().to_string())),
        }
    }
}
