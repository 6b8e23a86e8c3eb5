//! Contracted callables.
//!
//! A [`ContractedFn`] pairs a native body with per-parameter contracts and
//! an optional return contract. Every call binds arguments by position,
//! checks each parameter left to right, runs the body, and checks the
//! return value — all sharing one binding environment, so a symbolic size
//! like `N` must agree across parameters and the return value of a single
//! call.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use pacta_check::{check_in, BindingEnv, Registry, Value};
use pacta_core::Contract;

use crate::error::EnforceError;
use crate::switch::all_disabled;

/// The native body of a wrapped callable.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A callable wrapped with contracts.
#[derive(Clone)]
pub struct ContractedFn {
    name: String,
    params: IndexMap<String, Contract>,
    ret: Option<Contract>,
    body: NativeFn,
}

impl fmt::Debug for ContractedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractedFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .finish_non_exhaustive()
    }
}

/// Checks every argument against its parameter contract, sharing one
/// environment. Returns the environment for the return-contract check.
pub(crate) fn check_params(
    function: &str,
    registry: &Registry,
    params: &IndexMap<String, Contract>,
    args: &[Value],
) -> Result<BindingEnv, EnforceError> {
    if args.len() != params.len() {
        return Err(EnforceError::ArityMismatch {
            function: function.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }
    let mut env = BindingEnv::new();
    for ((name, contract), arg) in params.iter().zip(args) {
        check_in(contract, arg, registry, &mut env).map_err(|source| {
            EnforceError::ParamViolation {
                function: function.to_string(),
                param: name.clone(),
                source,
            }
        })?;
    }
    Ok(env)
}

/// Checks the return value in the environment the parameters produced.
pub(crate) fn check_return(
    function: &str,
    registry: &Registry,
    ret: &Contract,
    out: &Value,
    env: &mut BindingEnv,
) -> Result<(), EnforceError> {
    check_in(ret, out, registry, env).map_err(|source| EnforceError::ReturnViolation {
        function: function.to_string(),
        source,
    })
}

impl ContractedFn {
    /// Wraps `body` with no contracts yet; attach them with
    /// [`ContractedFn::param`] and [`ContractedFn::returns`].
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        ContractedFn {
            name: name.to_string(),
            params: IndexMap::new(),
            ret: None,
            body: Arc::new(body),
        }
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

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls through the process-wide registry.
    pub fn call(&self, args: &[Value]) -> Result<Value, EnforceError> {
        self.call_in(Registry::global(), args)
    }

    /// Calls with an explicit registry.
    ///
    /// # Errors
    ///
    /// [`EnforceError::ParamViolation`] / [`EnforceError::ReturnViolation`]
    /// when a contract fails; [`EnforceError::ArityMismatch`] when the
    /// argument count is wrong.
    pub fn call_in(&self, registry: &Registry, args: &[Value]) -> Result<Value, EnforceError> {
        if all_disabled() {
            debug!(function = %self.name, "contract checks disabled, dispatching directly");
            return Ok((self.body)(args));
        }
        let mut env = check_params(&self.name, registry, &self.params, args)?;
        let out = (self.body)(args);
        if let Some(ret) = &self.ret {
            check_return(&self.name, registry, ret, &out, &mut env)?;
        }
        Ok(out)
    }
}

/// Wraps a callable with a full contract specification at once: an ordered
/// mapping from parameter name to contract, plus an optional return
/// contract.
pub fn wrap_with_contracts<F>(
    name: &str,
    params: IndexMap<String, Contract>,
    ret: Option<Contract>,
    body: F,
) -> ContractedFn
where
    F: Fn(&[Value]) -> Value + Send + Sync + 'static,
{
    ContractedFn {
        name: name.to_string(),
        params,
        ret,
        body: Arc::new(body),
    }
}
