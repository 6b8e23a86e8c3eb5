//! Parser for pacta contract expressions.
//!
//! [`parse`] turns an expression string such as `list[N](int),N>0` into a
//! [`Contract`] tree, memoizing by exact input string so repeated literals
//! are parsed once per process. Caching is purely a performance concern:
//! [`parse_uncached`] is behaviorally identical.

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::ParseError;

use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use lru::LruCache;
use tracing::trace;

use pacta_core::Contract;

const CACHE_CAPACITY: usize = 512;

static CACHE: OnceLock<Mutex<LruCache<String, Contract>>> = OnceLock::new();

fn cache() -> &'static Mutex<LruCache<String, Contract>> {
    CACHE.get_or_init(|| {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).expect("cache capacity is nonzero");
        Mutex::new(LruCache::new(capacity))
    })
}

/// Parses a contract expression, consulting the process-wide cache first.
///
/// # Errors
///
/// Returns a [`ParseError`] with the offending substring and byte position
/// for any input outside the grammar.
pub fn parse(input: &str) -> Result<Contract, ParseError> {
    if let Ok(mut guard) = cache().lock() {
        if let Some(hit) = guard.get(input) {
            trace!(expr = input, "parse cache hit");
            return Ok(hit.clone());
        }
    }
    let parsed = parse_uncached(input)?;
    if let Ok(mut guard) = cache().lock() {
        guard.put(input.to_string(), parsed.clone());
    }
    Ok(parsed)
}

/// Parses a contract expression without touching the cache.
pub fn parse_uncached(input: &str) -> Result<Contract, ParseError> {
    parser::Parser::new(input)?.parse_top()
}
