//! Errors raised by a browser session while performing one action.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element detached: {0}")]
    Detached(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Action failed: {0}")]
    Failed(String),

    #[error("Browser session closed")]
    SessionClosed,
}
