//! Core error types for pacta-core.
//!
//! Uses `thiserror` for structured, matchable error variants. Syntax errors
//! live in `pacta-parse`; evaluation errors live in `pacta-check`.

use thiserror::Error;

/// Errors produced by the core data model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A debug form string did not describe a valid contract tree.
    #[error("malformed debug form: {reason}")]
    MalformedDebugForm { reason: String },

    /// A serialized byte sequence did not describe a valid contract tree.
    #[error("malformed contract bytes: {reason}")]
    MalformedBytes { reason: String },
}
