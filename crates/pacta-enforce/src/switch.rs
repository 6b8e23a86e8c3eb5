//! Process-wide enable/disable switch for contract checking.
//!
//! When disabled, wrapped callables dispatch straight to their bodies: no
//! environment is built and no evaluation runs. Re-enabling restores
//! checking without re-wrapping anything.
//!
//! The initial state comes from the `PACTA_DISABLE_CONTRACTS` environment
//! variable, read once on first use; after that only [`enable_all`] and
//! [`disable_all`] change it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use tracing::debug;

const ENV_VAR: &str = "PACTA_DISABLE_CONTRACTS";

fn switch() -> &'static AtomicBool {
    static SWITCH: OnceLock<AtomicBool> = OnceLock::new();
    SWITCH.get_or_init(|| {
        let disabled = std::env::var(ENV_VAR)
            .map(|v| matches!(v.as_str(), "1" | "true" | "True" | "TRUE" | "yes"))
            .unwrap_or(false);
        if disabled {
            debug!("contract checking disabled via {}", ENV_VAR);
        }
        AtomicBool::new(disabled)
    })
}

/// Turns contract checking on.
pub fn enable_all() {
    switch().store(false, Ordering::Relaxed);
}

/// Turns contract checking off process-wide.
pub fn disable_all() {
    switch().store(true, Ordering::Relaxed);
}

/// True if checking is currently disabled.
pub fn all_disabled() -> bool {
    switch().load(Ordering::Relaxed)
}
