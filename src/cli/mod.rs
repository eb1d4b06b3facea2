//! CLI module for schemastore
//!
//! Provides command-line interface for:
//! - init: Create the data directory
//! - put/get/list/delete: One facade call each, JSON out

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{delete, get, init, list, put, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::read_record;
