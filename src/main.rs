//! schemastore CLI entry point
//!
//! Parses arguments, runs one command and exits non-zero on failure.
//! All logic lives in the `cli` module. Stdout carries the JSON outcome;
//! stderr is left to store event logs.

use schemastore::cli;

fn main() {
    // Failures are already on stdout as a JSON error response
    if cli::run().is_err() {
        std::process::exit(1);
    }
}
