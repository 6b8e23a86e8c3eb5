//! pacta command line tools.
//!
//! Provides the `pacta` binary with subcommands for working with contract
//! expressions: `parse` renders the canonical and debug forms, `check`
//! evaluates a JSON value against an expression. Both go through the same
//! `pacta_parse`/`pacta_check` pipeline as library callers.

use std::process;

use clap::{Parser, Subcommand};

use pacta_check::{Check, Value};

/// Contract expression tools.
#[derive(Parser)]
#[command(name = "pacta", about = "Contract expression tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse an expression and print its canonical form.
    Parse {
        /// The contract expression, e.g. 'list[N](int),N>0'.
        expr: String,

        /// Also print the JSON debug form.
        #[arg(long)]
        debug: bool,
    },

    /// Check a JSON value against a contract expression.
    Check {
        /// The contract expression.
        expr: String,

        /// The value to check, as JSON.
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Parse { expr, debug } => run_parse(&expr, debug),
        Commands::Check { expr, value } => run_check(&expr, &value),
    };
    process::exit(exit_code);
}

/// Execute the parse subcommand.
///
/// Returns exit code: 0 = parsed, 1 = syntax error.
fn run_parse(expr: &str, debug: bool) -> i32 {
    match pacta_parse::parse(expr) {
        Ok(contract) => {
            println!("{}", contract.canonical_string());
            if debug {
                println!("{}", contract.debug_form());
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 = value satisfies the contract, 1 = syntax error,
/// 2 = contract violation or evaluation error, 3 = invalid JSON input.
fn run_check(expr: &str, value: &str) -> i32 {
    let contract = match pacta_parse::parse(expr) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let json: serde_json::Value = match serde_json::from_str(value) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: invalid JSON value: {}", e);
            return 3;
        }
    };

    match contract.check(&Value::from_json(json)) {
        Ok(()) => {
            println!("ok");
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    }
}
