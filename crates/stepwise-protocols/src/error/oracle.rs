//! Matching oracle errors.
//!
//! None of these ever reach a step result: the resolver downgrades every
//! oracle failure to "no match".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid oracle response: {0}")]
    InvalidResponse(String),

    #[error("Oracle returned out-of-range candidate {index} (of {count})")]
    OutOfRange { index: usize, count: usize },

    #[error("Oracle disabled")]
    Disabled,
}
