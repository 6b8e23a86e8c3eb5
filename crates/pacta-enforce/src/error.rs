//! Enforcement error types.

use thiserror::Error;

use pacta_check::CheckError;
use pacta_parse::ParseError;

/// Errors produced by the enforcement layer.
#[derive(Debug, Error)]
pub enum EnforceError {
    /// An argument failed its parameter contract.
    #[error("parameter '{param}' of '{function}': {source}")]
    ParamViolation {
        function: String,
        param: String,
        #[source]
        source: CheckError,
    },

    /// The result failed the return contract.
    #[error("return value of '{function}': {source}")]
    ReturnViolation {
        function: String,
        #[source]
        source: CheckError,
    },

    /// Instantiation was attempted while must-override obligations remain.
    #[error("cannot instantiate '{class}': methods must be overridden: {}", .methods.join(", "))]
    AbstractObligationUnsatisfied {
        class: String,
        methods: Vec<String>,
    },

    /// Contracts were attached to a static or class-scoped function.
    /// Enforcement is only defined for instance methods.
    #[error("cannot attach contracts to '{class}.{method}': only instance methods are enforceable")]
    UnsupportedEnforcementTarget { class: String, method: String },

    /// The call supplied the wrong number of arguments.
    #[error("'{function}' expects {expected} arguments, got {got}")]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    /// Dispatch to a method the class does not define.
    #[error("no method '{method}' on class '{class}'")]
    UnknownMethod { class: String, method: String },

    /// A concrete method was declared without a body.
    #[error("method '{class}.{method}' has no body")]
    MissingBody { class: String, method: String },

    /// A contract expression inside a declaration failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
