//! Class assembly with contract and must-override enforcement.
//!
//! Rather than an implicit construction hook, classes are assembled through
//! an explicit [`ClassBuilder`]: every method is declared as a [`MethodDef`]
//! carrying its kind, an optional must-override marker, optional contracts
//! and an optional body. Building a class overlays its declarations onto the
//! parent's resolved table, which gives the two inheritance behaviors the
//! enforcement layer guarantees:
//!
//! - an override without its own contracts inherits the nearest ancestor
//!   declaration's contracts, so a concrete subclass method is still checked
//!   against the contract declared on the abstract ancestor;
//! - a must-override obligation stays pending until some descendant supplies
//!   a concrete body, and [`Class::instantiate`] refuses while any
//!   obligation is pending.
//!
//! The must-override marker and the contract attachment are independent
//! fields of the declaration, so the order they are applied in cannot
//! change behavior.
//!
//! Only instance methods are enforceable. Attaching contracts to a static
//! or class-scoped declaration is a usage error reported at declaration
//! time, not a silent no-op.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use pacta_check::{Registry, Value};
use pacta_core::Contract;

use crate::error::EnforceError;
use crate::func::{check_params, check_return, NativeFn};
use crate::switch::all_disabled;

/// How a method is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Instance,
    Static,
    Class,
}

/// Per-parameter and return contracts for one method.
#[derive(Debug, Clone, Default)]
pub struct MethodContracts {
    params: IndexMap<String, Contract>,
    ret: Option<Contract>,
}

impl MethodContracts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the next positional parameter with its contract.
    pub fn param(mut self, name: &str, contract: Contract) -> Self {
        self.params.insert(name.to_string(), contract);
        self
    }

    /// Declares the next positional parameter from an expression string.
    pub fn param_expr(self, name: &str, expr: &str) -> Result<Self, EnforceError> {
        let contract = pacta_parse::parse(expr)?;
        Ok(self.param(name, contract))
    }

    /// Declares the return contract.
    pub fn returns(mut self, contract: Contract) -> Self {
        self.ret = Some(contract);
        self
    }

    /// Declares the return contract from an expression string.
    pub fn returns_expr(self, expr: &str) -> Result<Self, EnforceError> {
        let contract = pacta_parse::parse(expr)?;
        Ok(self.returns(contract))
    }
}

/// One method declaration inside a [`ClassBuilder`].
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    kind: MethodKind,
    must_override: bool,
    contracts: Option<MethodContracts>,
    body: Option<NativeFn>,
}

impl MethodDef {
    /// A concrete instance-method declaration with no contracts yet.
    pub fn new(name: &str) -> Self {
        MethodDef {
            name: name.to_string(),
            kind: MethodKind::Instance,
            must_override: false,
            contracts: None,
            body: None,
        }
    }

    pub fn kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the method as an abstract obligation: subclasses must supply a
    /// concrete body before any of them can be instantiated.
    pub fn must_override(mut self) -> Self {
        self.must_override = true;
        self
    }

    /// Attaches contracts to the declaration.
    pub fn with_contracts(mut self, contracts: MethodContracts) -> Self {
        self.contracts = Some(contracts);
        self
    }

    pub fn body<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("must_override", &self.must_override)
            .field("has_contracts", &self.contracts.is_some())
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// A method after inheritance resolution.
#[derive(Clone)]
struct ResolvedMethod {
    kind: MethodKind,
    contracts: Option<MethodContracts>,
    body: Option<NativeFn>,
    pending_override: bool,
}

/// A fully assembled class.
pub struct Class {
    name: String,
    table: IndexMap<String, ResolvedMethod>,
}

/// Assembles a [`Class`] from method declarations and an optional parent.
pub struct ClassBuilder {
    name: String,
    parent: Option<Arc<Class>>,
    methods: Vec<MethodDef>,
}

impl fmt::Debug for ClassBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassBuilder")
            .field("name", &self.name)
            .field("has_parent", &self.parent.is_some())
            .field("methods", &self.methods)
            .finish()
    }
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        ClassBuilder {
            name: name.to_string(),
            parent: None,
            methods: Vec::new(),
        }
    }

    pub fn parent(mut self, parent: &Arc<Class>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Adds a method declaration.
    ///
    /// # Errors
    ///
    /// [`EnforceError::UnsupportedEnforcementTarget`] if contracts are
    /// attached to a non-instance method; [`EnforceError::MissingBody`] if a
    /// concrete declaration has no body.
    pub fn method(mut self, def: MethodDef) -> Result<Self, EnforceError> {
        if def.contracts.is_some() && def.kind != MethodKind::Instance {
            return Err(EnforceError::UnsupportedEnforcementTarget {
                class: self.name,
                method: def.name,
            });
        }
        if !def.must_override && def.body.is_none() {
            return Err(EnforceError::MissingBody {
                class: self.name,
                method: def.name,
            });
        }
        self.methods.push(def);
        Ok(self)
    }

    /// Resolves inheritance and produces the class.
    pub fn build(self) -> Arc<Class> {
        let mut table = self
            .parent
            .as_ref()
            .map(|p| p.table.clone())
            .unwrap_or_default();
        for def in self.methods {
            let inherited = table.get(&def.name);
            // An override without its own contracts keeps the ancestor's.
            let contracts = def
                .contracts
                .or_else(|| inherited.and_then(|m| m.contracts.clone()));
            table.insert(
                def.name,
                ResolvedMethod {
                    kind: def.kind,
                    contracts,
                    body: def.body,
                    pending_override: def.must_override,
                },
            );
        }
        Arc::new(Class {
            name: self.name,
            table,
        })
    }
}

impl Class {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods whose must-override obligation is still pending.
    pub fn unsatisfied_obligations(&self) -> Vec<String> {
        self.table
            .iter()
            .filter(|(_, m)| m.pending_override)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Creates an instance.
    ///
    /// # Errors
    ///
    /// [`EnforceError::AbstractObligationUnsatisfied`] if any must-override
    /// obligation is still pending anywhere in the inheritance chain.
    pub fn instantiate(self: &Arc<Self>) -> Result<Instance, EnforceError> {
        let methods = self.unsatisfied_obligations();
        if !methods.is_empty() {
            return Err(EnforceError::AbstractObligationUnsatisfied {
                class: self.name.clone(),
                methods,
            });
        }
        Ok(Instance {
            class: Arc::clone(self),
        })
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("methods", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An instance of an assembled class. Method calls dispatch through the
/// resolved table and are checked against the effective contracts.
#[derive(Debug, Clone)]
pub struct Instance {
    class: Arc<Class>,
}

impl Instance {
    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    /// Calls a method through the process-wide registry.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, EnforceError> {
        self.call_in(Registry::global(), method, args)
    }

    /// Calls a method with an explicit registry.
    pub fn call_in(
        &self,
        registry: &Registry,
        method: &str,
        args: &[Value],
    ) -> Result<Value, EnforceError> {
        let resolved = self.class.table.get(method).ok_or_else(|| {
            EnforceError::UnknownMethod {
                class: self.class.name.clone(),
                method: method.to_string(),
            }
        })?;
        let body = resolved.body.as_ref().ok_or_else(|| EnforceError::MissingBody {
            class: self.class.name.clone(),
            method: method.to_string(),
        })?;
        if all_disabled() {
            return Ok(body(args));
        }
        match &resolved.contracts {
            None => Ok(body(args)),
            Some(contracts) => {
                let label = format!("{}.{}", self.class.name, method);
                let mut env = check_params(&label, registry, &contracts.params, args)?;
                let out = body(args);
                if let Some(ret) = &contracts.ret {
                    check_return(&label, registry, ret, &out, &mut env)?;
                }
                Ok(out)
            }
        }
    }
}
