//! Runtime value representation checked against contracts.
//!
//! [`Value`] is the dynamic counterpart to the contract AST. Compound values
//! are Vec-backed; `Set` and `Map` carry their entries in insertion order so
//! violation reports are deterministic. Uniqueness of set elements and map
//! keys is the constructor's concern, not the checker's.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A runtime value under contract check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// The absent value (`none` in contract expressions).
    Nil,
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    /// Key/value pairs in insertion order.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Returns a human-readable description of the value's shape.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Nil => "none",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }

    /// The value as a string literal for construction convenience.
    pub fn str(s: &str) -> Value {
        Value::Str(s.to_string())
    }

    /// Builds a `Set`, dropping duplicate elements.
    pub fn set(items: Vec<Value>) -> Value {
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Builds a `Map`, keeping the first entry for a duplicated key.
    pub fn map(pairs: Vec<(Value, Value)>) -> Value {
        let mut unique: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
        for (k, v) in pairs {
            if !unique.iter().any(|(existing, _)| *existing == k) {
                unique.push((k, v));
            }
        }
        Value::Map(unique)
    }

    /// Converts a `serde_json::Value`. Objects become `Map` with `Str` keys,
    /// arrays become `List`, integral numbers become `Int`. JSON has no
    /// tuple or set shape, so those never come out of this conversion.
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Nil => write!(f, "none"),
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                write!(f, ")")
            }
            Value::Set(items) => {
                write!(f, "{{")?;
                write_items(f, items)?;
                write!(f, "}}")
            }
            Value::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_literals() {
        let v = Value::Map(vec![
            (Value::str("a"), Value::List(vec![Value::Int(1), Value::Int(2)])),
            (Value::str("b"), Value::Nil),
        ]);
        assert_eq!(v.to_string(), r#"{"a": [1, 2], "b": none}"#);
        assert_eq!(
            Value::Tuple(vec![Value::Bool(true), Value::Float(0.5)]).to_string(),
            "(true, 0.5)"
        );
    }

    #[test]
    fn set_constructor_drops_duplicates() {
        let v = Value::set(vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
        assert_eq!(v, Value::Set(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn map_constructor_keeps_first_entry() {
        let v = Value::map(vec![
            (Value::str("a"), Value::Int(1)),
            (Value::str("a"), Value::Int(2)),
        ]);
        assert_eq!(v, Value::Map(vec![(Value::str("a"), Value::Int(1))]));
    }

    #[test]
    fn from_json_maps_shapes() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": [1, 2.5], "b": null, "c": "x"}"#).unwrap();
        let v = Value::from_json(json);
        assert_eq!(
            v,
            Value::Map(vec![
                (
                    Value::str("a"),
                    Value::List(vec![Value::Int(1), Value::Float(2.5)])
                ),
                (Value::str("b"), Value::Nil),
                (Value::str("c"), Value::str("x")),
            ])
        );
    }

    #[test]
    fn serde_roundtrip() {
        let v = Value::List(vec![Value::Int(1), Value::str("two"), Value::Nil]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
