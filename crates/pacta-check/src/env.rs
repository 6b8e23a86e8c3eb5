//! Binding environment for symbolic variables.
//!
//! Scoped to a single top-level evaluation: the first concrete value
//! observed for a name wins, and every later observation must agree.
//! Environments are tiny (an expression rarely uses more than a couple of
//! variables), so storage is an inline smallvec.

use smallvec::SmallVec;

use crate::error::CheckError;
use crate::value::Value;

/// Evaluation-scoped map from symbolic variable name to observed value.
#[derive(Debug, Clone, Default)]
pub struct BindingEnv {
    slots: SmallVec<[(String, Value); 4]>,
}

impl BindingEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Observes `value` for `name`: binds on first sight, otherwise requires
    /// agreement with the bound value.
    pub fn observe(&mut self, name: &str, value: Value) -> Result<(), CheckError> {
        match self.get(name) {
            None => {
                self.slots.push((name.to_string(), value));
                Ok(())
            }
            Some(first) if *first == value => Ok(()),
            Some(first) => Err(CheckError::BindingMismatch {
                name: name.to_string(),
                first: first.clone(),
                second: value,
            }),
        }
    }

    /// Snapshot of all bindings, in observation order.
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.slots.to_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
