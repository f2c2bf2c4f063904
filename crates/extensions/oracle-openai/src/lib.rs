//! OpenAI-compatible matching oracle for Stepwise.
//!
//! Sends the candidate list to a chat-completions endpoint and expects a
//! strict JSON verdict back. Works with any server speaking the same API.

mod api;
mod oracle;
mod prompt;

pub use oracle::OpenAiMatchOracle;
