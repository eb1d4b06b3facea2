//! CLI argument definitions using clap
//!
//! Commands:
//! - schemastore init --config <path>
//! - schemastore put --config <path> [--file <path>]
//! - schemastore get --config <path> <id>
//! - schemastore list --config <path>
//! - schemastore delete --config <path> <id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemastore - persistence for credential schema records
#[derive(Parser, Debug)]
#[command(name = "schemastore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./schemastore.json")]
        config: PathBuf,
    },

    /// Store one schema record read as JSON
    Put {
        /// Path to configuration file
        #[arg(long, default_value = "./schemastore.json")]
        config: PathBuf,

        /// Read the record from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the schema record with the given id
    Get {
        /// Path to configuration file
        #[arg(long, default_value = "./schemastore.json")]
        config: PathBuf,

        /// Record id
        id: String,
    },

    /// Print every readable schema record
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./schemastore.json")]
        config: PathBuf,
    },

    /// Delete the schema record with the given id
    Delete {
        /// Path to configuration file
        #[arg(long, default_value = "./schemastore.json")]
        config: PathBuf,

        /// Record id
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
