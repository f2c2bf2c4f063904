//! Run-level browser session errors.

use thiserror::Error;

/// Failures that make a whole run unusable. These are the only errors that
/// turn a test result into status `error`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Browser connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Browser teardown failed: {0}")]
    TeardownFailed(String),
}
