//! Canonical string form and the JSON debug form.
//!
//! The canonical form is the `Display` rendering of a [`Contract`]. It obeys
//! the round-trip law: reparsing `c.to_string()` yields a tree structurally
//! equal to `c`, and for inputs already in canonical form the rendering is
//! the input verbatim.
//!
//! The debug form is self-describing JSON; [`Contract::from_debug_form`]
//! reconstructs an equal tree from it.

use std::fmt;

use crate::ast::{CollectionKind, Contract, LogicalOp, Number, Operand};
use crate::error::CoreError;

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            // Force a decimal point so the literal re-lexes as a float.
            Number::Float(x) if x.fract() == 0.0 => write!(f, "{:.1}", x),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(n) => write!(f, "{}", n),
            Operand::Variable(name) => write!(f, "{}", name),
        }
    }
}

/// True if `c` must be parenthesized when embedded in an OR chain or under
/// a NOT, to keep the rendering unambiguous on reparse.
fn needs_group(c: &Contract) -> bool {
    matches!(
        c,
        Contract::Logical { op: LogicalOp::Or, .. } | Contract::Composite { .. }
    )
}

fn write_grouped(f: &mut fmt::Formatter<'_>, c: &Contract) -> fmt::Result {
    if needs_group(c) {
        write!(f, "({})", c)
    } else {
        write!(f, "{}", c)
    }
}

/// Renders a collection's element (or map value) sub-contract. A bare AND is
/// inlined as a comma list, so `list(int,>0)` survives a round trip without
/// growing parentheses.
fn write_inline_clauses(f: &mut fmt::Formatter<'_>, c: &Contract) -> fmt::Result {
    if let Contract::Logical {
        op: LogicalOp::And,
        children,
    } = c
    {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", child)?;
        }
        Ok(())
    } else {
        write!(f, "{}", c)
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contract::Composite { clauses } => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", clause)?;
                }
                Ok(())
            }
            Contract::Logical { op, children } => match op {
                LogicalOp::And => {
                    write!(f, "(")?;
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", child)?;
                    }
                    write!(f, ")")
                }
                LogicalOp::Or => {
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            write!(f, "|")?;
                        }
                        write_grouped(f, child)?;
                    }
                    Ok(())
                }
                LogicalOp::Not => {
                    write!(f, "!")?;
                    match children.first() {
                        Some(child) => write_grouped(f, child),
                        None => Ok(()),
                    }
                }
            },
            Contract::Comparison { lhs, op, rhs } => {
                if let Some(name) = lhs {
                    write!(f, "{}", name)?;
                }
                write!(f, "{}{}", op.symbol(), rhs)
            }
            Contract::ExtensionRef { name } => write!(f, "{}", name),
            Contract::Binding { name } => write!(f, "{}", name),
            Contract::Collection {
                kind,
                key,
                element,
                size_binding,
                exact_size,
            } => {
                write!(f, "{}", kind.keyword())?;
                if let Some(var) = size_binding {
                    write!(f, "[{}]", var)?;
                } else if let Some(n) = exact_size {
                    write!(f, "[{}]", n)?;
                }
                match (kind, key, element) {
                    (CollectionKind::Map, Some(k), Some(v)) => {
                        write!(f, "({}:", k)?;
                        write_inline_clauses(f, v)?;
                        write!(f, ")")
                    }
                    (_, _, Some(elem)) => {
                        write!(f, "(")?;
                        write_inline_clauses(f, elem)?;
                        write!(f, ")")
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

impl Contract {
    /// The canonical string form. Alias for `to_string()`, named to match
    /// the public API surface.
    pub fn canonical_string(&self) -> String {
        self.to_string()
    }

    /// A self-describing JSON rendering of the tree.
    pub fn debug_form(&self) -> String {
        // Serialization of a finite tree of plain data cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reconstructs a tree from [`Contract::debug_form`] output.
    pub fn from_debug_form(form: &str) -> Result<Contract, CoreError> {
        serde_json::from_str(form).map_err(|e| CoreError::MalformedDebugForm {
            reason: e.to_string(),
        })
    }

    /// Byte-level serialization of the tree. Extension references are
    /// serialized by name only, so the bytes stay meaningful in any process
    /// that registers the same names.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Inverse of [`Contract::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Contract, CoreError> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::MalformedBytes {
            reason: e.to_string(),
        })
    }
}
