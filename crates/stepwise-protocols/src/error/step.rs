//! Step-level error taxonomy.

use thiserror::Error;

use super::ActionError;

/// Why a single step attempt failed.
///
/// Step errors are always contained by the step executor: they end up as a
/// human-readable string on a failed step result, never as a propagated error.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Could not resolve target: {0}")]
    ResolutionNotFound(String),

    #[error("Action timed out: {0}")]
    ActionTimeout(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    /// The step itself is incomplete: a missing URL, text, key, option or
    /// target. Retrying cannot fix it.
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    #[error("Run cancelled")]
    Cancelled,
}

impl StepError {
    /// Whether another attempt within the step's budget could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            StepError::ResolutionNotFound(_)
            | StepError::ActionTimeout(_)
            | StepError::ActionFailed(_) => true,
            StepError::UnsupportedAction(_)
            | StepError::InvalidStep(_)
            | StepError::Cancelled => false,
        }
    }
}

impl From<ActionError> for StepError {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::Timeout(msg) => StepError::ActionTimeout(msg),
            ActionError::ElementNotFound(msg) => {
                StepError::ActionFailed(format!("element not found: {}", msg))
            }
            ActionError::Detached(msg) => {
                StepError::ActionFailed(format!("element detached: {}", msg))
            }
            ActionError::AssertionFailed(msg) => StepError::ActionFailed(msg),
            ActionError::Failed(msg) => StepError::ActionFailed(msg),
            ActionError::SessionClosed => {
                StepError::ActionFailed("browser session closed".to_string())
            }
        }
    }
}
