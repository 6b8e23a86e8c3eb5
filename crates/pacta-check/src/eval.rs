//! Contract evaluation engine.
//!
//! Walks a [`Contract`] tree against a [`Value`], threading one
//! [`BindingEnv`] through the whole top-level evaluation so symbolic
//! variables agree across sibling sub-expressions. Short-circuits on the
//! first failure; the reported violation names the minimal failing
//! sub-expression.
//!
//! Value failures (`Violation`) and semantic errors (unresolved extension,
//! unbound variable, binding mismatch) propagate differently: OR and NOT
//! absorb value failures as part of their logic but always abort on a
//! semantic error, and collections aggregate only value failures into their
//! own violation.

use pacta_core::{CmpOp, CollectionKind, Contract, LogicalOp, Number, Operand};

use crate::env::BindingEnv;
use crate::error::{CheckError, Violation};
use crate::registry::Registry;
use crate::value::Value;

/// Checks `value` against `contract` with a fresh environment and the
/// process-wide registry.
pub fn check(contract: &Contract, value: &Value) -> Result<(), CheckError> {
    let mut env = BindingEnv::new();
    check_in(contract, value, Registry::global(), &mut env)
}

/// Method-call sugar for [`check`].
pub trait Check {
    /// # Errors
    ///
    /// Returns a [`CheckError`] describing the failing sub-expression, the
    /// offending value and the binding snapshot.
    fn check(&self, value: &Value) -> Result<(), CheckError>;
}

impl Check for Contract {
    fn check(&self, value: &Value) -> Result<(), CheckError> {
        check(self, value)
    }
}

fn violation(
    contract: &Contract,
    value: &Value,
    env: &BindingEnv,
    detail: Option<String>,
    cause: Option<CheckError>,
) -> CheckError {
    CheckError::Violation(Violation {
        expr: contract.canonical_string(),
        value: value.to_string(),
        detail,
        bindings: env.snapshot(),
        cause: cause.map(Box::new),
    })
}

/// Wraps a nested value failure into the parent collection's violation.
/// Semantic errors pass through untouched.
fn wrap_nested(
    parent: &Contract,
    value: &Value,
    env: &BindingEnv,
    context: String,
    err: CheckError,
) -> CheckError {
    match err {
        CheckError::Violation(_) => violation(parent, value, env, Some(context), Some(err)),
        other => other,
    }
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Int(n) => Some(Number::Int(*n)),
        Value::Float(x) => Some(Number::Float(*x)),
        _ => None,
    }
}

/// Int/Int compares exactly; any float operand compares as `f64`.
fn numbers_compare(op: CmpOp, lhs: Number, rhs: Number) -> bool {
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => op.compare(a, b),
        _ => op.compare(lhs.as_f64(), rhs.as_f64()),
    }
}

/// Checks `value` against `contract` with an explicit registry and an
/// inherited binding environment.
pub fn check_in(
    contract: &Contract,
    value: &Value,
    registry: &Registry,
    env: &mut BindingEnv,
) -> Result<(), CheckError> {
    match contract {
        Contract::Composite { clauses } => {
            for clause in clauses {
                check_in(clause, value, registry, env)?;
            }
            Ok(())
        }

        Contract::Logical { op, children } => match op {
            LogicalOp::And => {
                for child in children {
                    check_in(child, value, registry, env)?;
                }
                Ok(())
            }
            LogicalOp::Or => {
                let mut reasons = Vec::new();
                let mut first_failure = None;
                for child in children {
                    // Each alternative gets its own environment; only the
                    // successful branch's bindings survive.
                    let mut attempt = env.clone();
                    match check_in(child, value, registry, &mut attempt) {
                        Ok(()) => {
                            *env = attempt;
                            return Ok(());
                        }
                        Err(CheckError::Violation(v)) => {
                            reasons.push(v.to_string());
                            if first_failure.is_none() {
                                first_failure = Some(CheckError::Violation(v));
                            }
                        }
                        Err(other) => return Err(other),
                    }
                }
                Err(violation(
                    contract,
                    value,
                    env,
                    Some(format!("no alternative matched: {}", reasons.join("; "))),
                    first_failure,
                ))
            }
            LogicalOp::Not => {
                let child = match children.first() {
                    Some(child) => child,
                    None => return Ok(()),
                };
                let mut attempt = env.clone();
                match check_in(child, value, registry, &mut attempt) {
                    Err(CheckError::Violation(_)) => Ok(()),
                    Ok(()) => Err(violation(
                        contract,
                        value,
                        env,
                        Some("negated clause matched".to_string()),
                        None,
                    )),
                    Err(other) => Err(other),
                }
            }
        },

        Contract::Comparison { lhs, op, rhs } => {
            let lhs_num = match lhs {
                Some(name) => match env.get(name) {
                    None => {
                        return Err(CheckError::UnboundVariable { name: name.clone() })
                    }
                    Some(bound) => match as_number(bound) {
                        Some(n) => n,
                        None => {
                            let detail =
                                format!("variable {} is bound to non-numeric {}", name, bound);
                            return Err(violation(contract, value, env, Some(detail), None));
                        }
                    },
                },
                None => match as_number(value) {
                    Some(n) => n,
                    None => {
                        let detail =
                            format!("expected a numeric value, got {}", value.type_name());
                        return Err(violation(contract, value, env, Some(detail), None));
                    }
                },
            };
            let rhs_num = match rhs {
                Operand::Literal(n) => *n,
                Operand::Variable(name) => match env.get(name) {
                    None => {
                        return Err(CheckError::UnboundVariable { name: name.clone() })
                    }
                    Some(bound) => match as_number(bound) {
                        Some(n) => n,
                        None => {
                            let detail =
                                format!("variable {} is bound to non-numeric {}", name, bound);
                            return Err(violation(contract, value, env, Some(detail), None));
                        }
                    },
                },
            };
            if numbers_compare(*op, lhs_num, rhs_num) {
                Ok(())
            } else {
                Err(violation(contract, value, env, None, None))
            }
        }

        Contract::ExtensionRef { name } => {
            let ext = registry
                .resolve(name)
                .ok_or_else(|| CheckError::UnresolvedExtension { name: name.clone() })?;
            match ext.check(value) {
                Ok(true) => Ok(()),
                Ok(false) => Err(violation(contract, value, env, None, None)),
                Err(failure) => {
                    let detail = failure.message.clone();
                    Err(violation(
                        contract,
                        value,
                        env,
                        Some(detail),
                        Some(CheckError::Checker(failure)),
                    ))
                }
            }
        }

        Contract::Binding { name } => env.observe(name, value.clone()),

        Contract::Collection {
            kind,
            key,
            element,
            size_binding,
            exact_size,
        } => {
            let len = match (kind, value) {
                (CollectionKind::List, Value::List(items)) => items.len(),
                (CollectionKind::Tuple, Value::Tuple(items)) => items.len(),
                (CollectionKind::Set, Value::Set(items)) => items.len(),
                (CollectionKind::Map, Value::Map(pairs)) => pairs.len(),
                _ => {
                    let detail =
                        format!("expected {}, got {}", kind.keyword(), value.type_name());
                    return Err(violation(contract, value, env, Some(detail), None));
                }
            };

            if let Some(var) = size_binding {
                env.observe(var, Value::Int(len as i64))?;
            }
            if let Some(expected) = exact_size {
                if len as u64 != *expected {
                    let detail = format!("expected {} elements, got {}", expected, len);
                    return Err(violation(contract, value, env, Some(detail), None));
                }
            }

            match value {
                Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                    if let Some(elem_contract) = element {
                        for (i, item) in items.iter().enumerate() {
                            if let Err(e) = check_in(elem_contract, item, registry, env) {
                                return Err(wrap_nested(
                                    contract,
                                    value,
                                    env,
                                    format!("element {}", i),
                                    e,
                                ));
                            }
                        }
                    }
                }
                Value::Map(pairs) => {
                    for (k, v) in pairs {
                        if let Some(key_contract) = key {
                            if let Err(e) = check_in(key_contract, k, registry, env) {
                                return Err(wrap_nested(
                                    contract,
                                    value,
                                    env,
                                    format!("key {}", k),
                                    e,
                                ));
                            }
                        }
                        if let Some(value_contract) = element {
                            if let Err(e) = check_in(value_contract, v, registry, env) {
                                return Err(wrap_nested(
                                    contract,
                                    value,
                                    env,
                                    format!("value for key {}", k),
                                    e,
                                ));
                            }
                        }
                    }
                }
                _ => {}
            }
            Ok(())
        }
    }
}
