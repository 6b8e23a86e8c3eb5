//! Process-wide named-predicate registry.
//!
//! Contract trees reference extensions by name only, so a tree survives
//! serialization as long as the deserializing process registers the same
//! names. Registration rejects duplicates: overwriting would silently change
//! the meaning of already-parsed trees referencing the name.
//!
//! [`Registry::global`] is the shared process instance, pre-populated with
//! the built-in shape predicates. Tests that need isolation construct their
//! own [`Registry::new`] and evaluate through `check_in`.

use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

use crate::error::ExtensionFailure;
use crate::value::Value;

/// A registered checker: pass, fail, or fail with a message that gets
/// chained onto the violation.
pub type CheckerFn = Arc<dyn Fn(&Value) -> Result<bool, ExtensionFailure> + Send + Sync>;

/// A named predicate usable inside contract expressions.
#[derive(Clone)]
pub struct Extension {
    name: String,
    checker: CheckerFn,
}

impl Extension {
    pub fn new<F>(name: &str, checker: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, ExtensionFailure> + Send + Sync + 'static,
    {
        Extension {
            name: name.to_string(),
            checker: Arc::new(checker),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value) -> Result<bool, ExtensionFailure> {
        (self.checker)(value)
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension").field("name", &self.name).finish()
    }
}

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name is already taken. Re-registration is rejected rather than
    /// overwritten; see the module docs.
    #[error("an extension named '{name}' is already registered")]
    Duplicate { name: String },
}

/// Named-predicate table. Reads happen on every evaluation; writes only on
/// explicit registration. No locking is promised for concurrent writers
/// beyond what the underlying map provides.
#[derive(Debug, Default)]
pub struct Registry {
    entries: DashMap<String, Extension>,
}

impl Registry {
    /// An empty registry with no built-ins, for isolated tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in shape predicates.
    pub fn with_builtins() -> Self {
        let registry = Registry::new();
        registry.install_builtins();
        registry
    }

    /// The process-wide registry, initialized with built-ins on first use.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::with_builtins)
    }

    /// Registers a named predicate. Fails if the name is taken.
    pub fn register<F>(&self, name: &str, checker: F) -> Result<(), RegistryError>
    where
        F: Fn(&Value) -> Result<bool, ExtensionFailure> + Send + Sync + 'static,
    {
        use dashmap::mapref::entry::Entry;
        match self.entries.entry(name.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate {
                name: name.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Extension::new(name, checker));
                debug!(name, "registered contract extension");
                Ok(())
            }
        }
    }

    /// Looks up a predicate by name. The extension is cloned out so no map
    /// guard is held while the checker runs.
    pub fn resolve(&self, name: &str) -> Option<Extension> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn install_builtins(&self) {
        let install = |name: &str, f: fn(&Value) -> bool| {
            // A fresh registry cannot collide with itself.
            let _ = self.register(name, move |v| Ok(f(v)));
        };
        install("*", |_| true);
        install("anything", |_| true);
        install("int", |v| matches!(v, Value::Int(_)));
        install("float", |v| matches!(v, Value::Float(_)));
        install("number", |v| matches!(v, Value::Int(_) | Value::Float(_)));
        install("bool", |v| matches!(v, Value::Bool(_)));
        install("str", |v| matches!(v, Value::Str(_)));
        install("string", |v| matches!(v, Value::Str(_)));
        install("none", |v| matches!(v, Value::Nil));
        install("seq", |v| {
            matches!(v, Value::List(_) | Value::Tuple(_) | Value::Str(_))
        });
        install("container", |v| {
            matches!(
                v,
                Value::List(_) | Value::Tuple(_) | Value::Set(_) | Value::Map(_)
            )
        });
        install("sized", |v| {
            matches!(
                v,
                Value::List(_) | Value::Tuple(_) | Value::Set(_) | Value::Map(_) | Value::Str(_)
            )
        });
    }
}

/// Registers a predicate in the process-wide registry.
pub fn register_contract<F>(name: &str, checker: F) -> Result<(), RegistryError>
where
    F: Fn(&Value) -> Result<bool, ExtensionFailure> + Send + Sync + 'static,
{
    Registry::global().register(name, checker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve() {
        let registry = Registry::new();
        registry
            .register("even", |v| Ok(matches!(v, Value::Int(n) if n % 2 == 0)))
            .unwrap();
        let ext = registry.resolve("even").unwrap();
        assert!(ext.check(&Value::Int(4)).unwrap());
        assert!(!ext.check(&Value::Int(3)).unwrap());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = Registry::new();
        registry.register("point", |_| Ok(true)).unwrap();
        let err = registry.register("point", |_| Ok(false)).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate { name: "point".into() });
        // The original checker is untouched.
        assert!(registry.resolve("point").unwrap().check(&Value::Nil).unwrap());
    }

    #[test]
    fn unknown_name_does_not_resolve() {
        let registry = Registry::new();
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn builtins_discriminate_shapes() {
        let registry = Registry::with_builtins();
        let seq = registry.resolve("seq").unwrap();
        assert!(seq.check(&Value::List(vec![])).unwrap());
        assert!(seq.check(&Value::Tuple(vec![])).unwrap());
        assert!(seq.check(&Value::str("abc")).unwrap());
        assert!(!seq.check(&Value::Set(vec![])).unwrap());
        assert!(!seq.check(&Value::Map(vec![])).unwrap());

        let number = registry.resolve("number").unwrap();
        assert!(number.check(&Value::Int(1)).unwrap());
        assert!(number.check(&Value::Float(1.5)).unwrap());
        assert!(!number.check(&Value::str("1")).unwrap());
    }

    #[test]
    fn isolated_registries_do_not_share_names() {
        let a = Registry::new();
        let b = Registry::new();
        a.register("only_in_a", |_| Ok(true)).unwrap();
        assert!(a.contains("only_in_a"));
        assert!(!b.contains("only_in_a"));
    }
}
