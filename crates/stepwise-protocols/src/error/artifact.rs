//! Artifact capture errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Artifact kind not supported: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: ArtifactError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("read-only"));
    }
}
