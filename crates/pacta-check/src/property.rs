//! Randomized probe harness for contract acceptance.
//!
//! Callers provide seed values (the interesting/edge cases) and an iteration
//! count. The harness generates randomized values with a deterministic PRNG,
//! checks each against the contract, and reports which inputs were accepted
//! and which were rejected, with the rejection error attached.
//!
//! Reproducibility: given the same `random_seed`, the same inputs are
//! generated and the same report is produced. The main use is smoke-testing
//! custom extension checkers against value shapes they did not anticipate.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pacta_core::Contract;

use crate::env::BindingEnv;
use crate::error::CheckError;
use crate::eval::check_in;
use crate::registry::Registry;
use crate::value::Value;

/// Configuration for a probe run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Caller-provided seed inputs (the "interesting" cases).
    pub seeds: Vec<Value>,
    /// Number of randomized iterations on top of the seeds.
    pub iterations: u32,
    /// PRNG seed for reproducibility.
    pub random_seed: u64,
}

/// Result of a probe run.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Total inputs checked (seeds + random variations).
    pub total_run: u32,
    /// Inputs the contract accepted.
    pub passed: u32,
    /// Rejected inputs with the error each produced.
    pub failures: Vec<ProbeFailure>,
    /// The seed used, echoed for reproducibility.
    pub random_seed: u64,
}

/// A single rejected input.
#[derive(Debug, Clone)]
pub struct ProbeFailure {
    pub input: Value,
    pub error: CheckError,
}

/// Generates a random value, with boundary values weighted into the mix.
pub fn generate_random_value(rng: &mut ChaCha8Rng, depth: u8) -> Value {
    // At depth 0 only scalars are generated, bounding recursion.
    let variants = if depth == 0 { 6 } else { 10 };
    match rng.gen_range(0..variants) {
        0 => Value::Bool(rng.gen_bool(0.5)),
        1 | 2 => {
            // ~30% chance of boundary value
            if rng.gen_ratio(3, 10) {
                let boundaries: &[i64] = &[0, 1, -1, i64::MIN, i64::MAX];
                Value::Int(boundaries[rng.gen_range(0..boundaries.len())])
            } else {
                Value::Int(rng.gen_range(-1_000_000..1_000_000))
            }
        }
        3 => {
            if rng.gen_ratio(3, 10) {
                let boundaries: &[f64] = &[0.0, -0.0, 1.0, -1.0];
                Value::Float(boundaries[rng.gen_range(0..boundaries.len())])
            } else {
                Value::Float(rng.gen_range(-1e9f64..1e9f64))
            }
        }
        4 => {
            let len = rng.gen_range(0..8);
            let s: String = (0..len)
                .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
                .collect();
            Value::Str(s)
        }
        5 => Value::Nil,
        6 => Value::List(random_items(rng, depth - 1)),
        7 => Value::Tuple(random_items(rng, depth - 1)),
        8 => Value::set(random_items(rng, depth - 1)),
        _ => {
            let len = rng.gen_range(0..4);
            Value::map(
                (0..len)
                    .map(|_| {
                        let key = generate_random_value(rng, 0);
                        (key, generate_random_value(rng, depth - 1))
                    })
                    .collect(),
            )
        }
    }
}

fn random_items(rng: &mut ChaCha8Rng, depth: u8) -> Vec<Value> {
    let len = rng.gen_range(0..4);
    (0..len).map(|_| generate_random_value(rng, depth)).collect()
}

/// Runs the probe: seeds first, then randomized values.
pub fn probe(contract: &Contract, registry: &Registry, config: &ProbeConfig) -> ProbeReport {
    let mut rng = ChaCha8Rng::seed_from_u64(config.random_seed);
    let mut report = ProbeReport {
        total_run: 0,
        passed: 0,
        failures: Vec::new(),
        random_seed: config.random_seed,
    };

    let mut run_one = |input: Value, report: &mut ProbeReport| {
        report.total_run += 1;
        let mut env = BindingEnv::new();
        match check_in(contract, &input, registry, &mut env) {
            Ok(()) => report.passed += 1,
            Err(error) => report.failures.push(ProbeFailure { input, error }),
        }
    };

    for seed in &config.seeds {
        run_one(seed.clone(), &mut report);
    }
    for _ in 0..config.iterations {
        let input = generate_random_value(&mut rng, 2);
        run_one(input, &mut report);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(iterations: u32, random_seed: u64) -> ProbeConfig {
        ProbeConfig {
            seeds: vec![Value::Int(0), Value::Nil],
            iterations,
            random_seed,
        }
    }

    #[test]
    fn same_seed_reproduces_the_report() {
        let registry = Registry::with_builtins();
        let contract = Contract::extension("number");
        let a = probe(&contract, &registry, &config(64, 7));
        let b = probe(&contract, &registry, &config(64, 7));
        assert_eq!(a.total_run, b.total_run);
        assert_eq!(a.passed, b.passed);
        assert_eq!(a.failures.len(), b.failures.len());
        for (x, y) in a.failures.iter().zip(&b.failures) {
            assert_eq!(x.input, y.input);
        }
    }

    #[test]
    fn seeds_are_always_run() {
        let registry = Registry::with_builtins();
        let contract = Contract::extension("int");
        let report = probe(
            &contract,
            &registry,
            &ProbeConfig {
                seeds: vec![Value::Int(1), Value::str("x")],
                iterations: 0,
                random_seed: 0,
            },
        );
        assert_eq!(report.total_run, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].input, Value::str("x"));
    }

    #[test]
    fn anything_accepts_every_generated_value() {
        let registry = Registry::with_builtins();
        let contract = Contract::extension("*");
        let report = probe(&contract, &registry, &config(128, 42));
        assert_eq!(report.passed, report.total_run);
        assert!(report.failures.is_empty());
    }
}
