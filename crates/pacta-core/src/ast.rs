//! Contract AST node variants.
//!
//! Every parsed contract expression becomes a tree of [`Contract`] nodes.
//! Trees are immutable once built. Equality is structural, with one
//! refinement: the children of AND/OR combinators (and of the top-level
//! comma [`Contract::Composite`], which is an implicit AND) compare as
//! multisets, since logical conjunction and disjunction commute. Evaluation
//! order is still left to right; commutativity applies to equality only.

use serde::{Deserialize, Serialize};

/// Logical combinator tag for [`Contract::Logical`].
///
/// `Not` always has exactly one child; `And`/`Or` have two or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

/// Numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    /// The canonical operator spelling. `Eq` prints as `=`; the parser also
    /// accepts `==`.
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
        }
    }

    /// Applies the operator to an ordered pair.
    pub fn compare<T: PartialOrd>(&self, lhs: T, rhs: T) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
        }
    }
}

/// A numeric literal appearing in a comparison.
///
/// The variant is preserved from the source text: `5` is `Int`, `5.0` is
/// `Float`. The canonical form always prints floats with a decimal point so
/// the variant survives a reparse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The value as an `f64`, for mixed-type comparisons.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::Float(f) => *f,
        }
    }
}

/// Right-hand operand of a comparison: a literal or a symbolic variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Literal(Number),
    Variable(String),
}

/// Collection shape tag for [`Contract::Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    List,
    Tuple,
    Set,
    Map,
}

impl CollectionKind {
    /// The grammar keyword for this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            CollectionKind::List => "list",
            CollectionKind::Tuple => "tuple",
            CollectionKind::Set => "set",
            CollectionKind::Map => "map",
        }
    }
}

/// A parsed contract expression.
///
/// Serialization is by structure; [`Contract::ExtensionRef`] nodes carry only
/// the predicate name, so a deserialized tree is meaningful in any process
/// that has registered the same names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Contract {
    /// AND/OR/NOT combinator over child contracts.
    Logical { op: LogicalOp, children: Vec<Contract> },

    /// A numeric comparison. `lhs` of `None` compares the value under test;
    /// `Some(name)` compares an already-bound symbolic variable (`N>0`).
    Comparison {
        lhs: Option<String>,
        op: CmpOp,
        rhs: Operand,
    },

    /// Reference to a named predicate, resolved through the extension
    /// registry at evaluation time, never at parse time.
    ExtensionRef { name: String },

    /// A parametrized collection shape. `key` is only ever present for
    /// `Map`. The grammar sets at most one of `size_binding`/`exact_size`.
    Collection {
        kind: CollectionKind,
        key: Option<Box<Contract>>,
        element: Option<Box<Contract>>,
        size_binding: Option<String>,
        exact_size: Option<u64>,
    },

    /// Standalone symbolic variable: observe/bind on first sight, require
    /// the same value on every later sight within one evaluation.
    Binding { name: String },

    /// Top-level comma list, an implicit AND.
    Composite { clauses: Vec<Contract> },
}

impl Contract {
    /// Builds an AND node.
    pub fn and(children: Vec<Contract>) -> Contract {
        Contract::Logical {
            op: LogicalOp::And,
            children,
        }
    }

    /// Builds an OR node.
    pub fn or(children: Vec<Contract>) -> Contract {
        Contract::Logical {
            op: LogicalOp::Or,
            children,
        }
    }

    /// Builds a NOT node.
    pub fn negate(child: Contract) -> Contract {
        Contract::Logical {
            op: LogicalOp::Not,
            children: vec![child],
        }
    }

    /// Builds an extension reference.
    pub fn extension(name: &str) -> Contract {
        Contract::ExtensionRef {
            name: name.to_string(),
        }
    }

    /// Builds a comparison against the value under test.
    pub fn comparison(op: CmpOp, rhs: Operand) -> Contract {
        Contract::Comparison { lhs: None, op, rhs }
    }
}

/// Order-insensitive slice equality: every element of `a` must match a
/// distinct element of `b`. Quadratic, but combinator arity is tiny.
fn multiset_eq(a: &[Contract], b: &[Contract]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for x in a {
        for (i, y) in b.iter().enumerate() {
            if !used[i] && x == y {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Contract::Logical { op: a, children: ca },
                Contract::Logical { op: b, children: cb },
            ) => {
                a == b
                    && match a {
                        LogicalOp::Not => ca == cb,
                        LogicalOp::And | LogicalOp::Or => multiset_eq(ca, cb),
                    }
            }
            (Contract::Composite { clauses: a }, Contract::Composite { clauses: b }) => {
                multiset_eq(a, b)
            }
            (
                Contract::Comparison { lhs: la, op: oa, rhs: ra },
                Contract::Comparison { lhs: lb, op: ob, rhs: rb },
            ) => la == lb && oa == ob && ra == rb,
            (Contract::ExtensionRef { name: a }, Contract::ExtensionRef { name: b }) => a == b,
            (Contract::Binding { name: a }, Contract::Binding { name: b }) => a == b,
            (
                Contract::Collection {
                    kind: ka,
                    key: keya,
                    element: ea,
                    size_binding: sa,
                    exact_size: xa,
                },
                Contract::Collection {
                    kind: kb,
                    key: keyb,
                    element: eb,
                    size_binding: sb,
                    exact_size: xb,
                },
            ) => ka == kb && keya == keyb && ea == eb && sa == sb && xa == xb,
            _ => false,
        }
    }
}
