//! Evaluation error types.
//!
//! Every failure carries enough structure to reconstruct the message:
//! the failing sub-expression's canonical string, a description of the
//! offending value, and the binding snapshot at the point of failure.
//! Errors are serializable so violations can cross process boundaries
//! alongside the contracts that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::value::Value;

/// A custom checker's failure message, preserved as the chained cause of
/// the violation that wraps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ExtensionFailure {
    pub message: String,
}

impl ExtensionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        ExtensionFailure {
            message: message.into(),
        }
    }
}

/// Errors produced by contract evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum CheckError {
    /// A value failed a predicate.
    #[error(transparent)]
    Violation(#[from] Violation),

    /// A named predicate was not registered at evaluation time. This is a
    /// semantic error, not a value failure: it always aborts evaluation,
    /// even under OR or NOT.
    #[error("no extension registered under the name '{name}'")]
    UnresolvedExtension { name: String },

    /// A symbolic variable was observed with two different values within
    /// one evaluation.
    #[error("variable {name} already bound to {first}, observed {second}")]
    BindingMismatch {
        name: String,
        first: Value,
        second: Value,
    },

    /// A comparison referenced a symbolic variable before anything bound it.
    #[error("variable {name} referenced before it was bound")]
    UnboundVariable { name: String },

    /// An underlying failure raised by a custom checker.
    #[error(transparent)]
    Checker(#[from] ExtensionFailure),
}

/// A structured contract violation.
///
/// The `Display` rendering is reconstructible purely from `expr`, `value`,
/// `detail` and `bindings`; nested causes hang off [`std::error::Error::source`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Canonical string of the minimal failing sub-expression.
    pub expr: String,
    /// Description of the offending value.
    pub value: String,
    /// Extra context: which element failed, a checker's message, and so on.
    pub detail: Option<String>,
    /// Binding environment snapshot at the point of failure.
    pub bindings: Vec<(String, Value)>,
    /// Nested failure this violation aggregates, if any.
    pub cause: Option<Box<CheckError>>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contract '{}' not satisfied by {}", self.expr, self.value)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        if !self.bindings.is_empty() {
            write!(f, " [bindings:")?;
            for (i, (name, value)) in self.bindings.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, " {}={}", name, value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|e| e as _)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_message_is_self_contained() {
        let v = Violation {
            expr: "list[N](int)".into(),
            value: "[1, \"x\"]".into(),
            detail: Some("element 1".into()),
            bindings: vec![("N".into(), Value::Int(2))],
            cause: None,
        };
        assert_eq!(
            v.to_string(),
            "contract 'list[N](int)' not satisfied by [1, \"x\"] (element 1) [bindings: N=2]"
        );
    }

    #[test]
    fn cause_is_reachable_through_source() {
        use std::error::Error as _;
        let inner = Violation {
            expr: "int".into(),
            value: "\"x\"".into(),
            detail: None,
            bindings: vec![],
            cause: None,
        };
        let outer = Violation {
            expr: "list(int)".into(),
            value: "[\"x\"]".into(),
            detail: Some("element 0".into()),
            bindings: vec![],
            cause: Some(Box::new(CheckError::Violation(inner.clone()))),
        };
        let source = outer.source().expect("source");
        assert_eq!(source.to_string(), inner.to_string());
    }

    #[test]
    fn errors_serialize() {
        let err = CheckError::BindingMismatch {
            name: "N".into(),
            first: Value::Int(2),
            second: Value::Int(1),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: CheckError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
