//! Structured syntax errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A syntax error in a contract expression.
///
/// Carries the byte offset and the offending substring so the message is
/// reproducible without access to the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("syntax error at byte {position} near '{snippet}': {message}")]
pub struct ParseError {
    /// What was wrong.
    pub message: String,
    /// Byte offset of the offending token (input length at end of input).
    pub position: usize,
    /// The offending substring, or `end of input`.
    pub snippet: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, position: usize, snippet: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            position,
            snippet: snippet.into(),
        }
    }
}
