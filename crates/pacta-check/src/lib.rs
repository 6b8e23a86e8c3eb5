//! Contract evaluation for pacta.
//!
//! Takes a parsed [`pacta_core::Contract`] and a runtime [`Value`] and
//! decides whether the value satisfies the contract, threading symbolic
//! bindings across the whole expression. Named predicates resolve through
//! the [`Registry`] at evaluation time, so serialized trees stay meaningful
//! wherever the same names are registered.

pub mod env;
pub mod error;
pub mod eval;
pub mod property;
pub mod registry;
pub mod value;

// Re-export commonly used types
pub use env::BindingEnv;
pub use error::{CheckError, ExtensionFailure, Violation};
pub use eval::{check, check_in, Check};
pub use property::{probe, ProbeConfig, ProbeFailure, ProbeReport};
pub use registry::{register_contract, CheckerFn, Extension, Registry, RegistryError};
pub use value::Value;
