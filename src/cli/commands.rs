//! CLI command implementations
//!
//! Each command loads the config, opens a `SchemaStorage` over a `LocalStore`
//! rooted at `data_dir`, performs one facade call and returns the JSON payload
//! to print. Store events are logged to stderr; command outcomes, failures
//! included, go to stdout as one JSON object.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::kv::{LocalStore, OpContext};
use crate::observability::Logger;
use crate::schema::{LoggingObserver, SchemaStorage, StoredSchema};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_record, write_error_to, write_response_to};

/// Marks a data directory as initialized
const MARKER_FILE: &str = ".schemastore";

/// Parse arguments, run the command, print the outcome to stdout
///
/// A returned error has already been reported, except when stdout itself
/// could not be written.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_to(&mut io::stdout(), cli.command)
}

pub(crate) fn run_to<W: Write>(out: &mut W, command: Command) -> CliResult<()> {
    match run_command(command) {
        Ok(data) => write_response_to(out, data),
        Err(e) => {
            write_error_to(out, e.code(), &e.to_string())?;
            Err(e)
        }
    }
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<Value> {
    match command {
        Command::Init { config } => init(&config),
        Command::Put { config, file } => put(&config, file.as_deref()),
        Command::Get { config, id } => get(&config, &id),
        Command::List { config } => list(&config),
        Command::Delete { config, id } => delete(&config, &id),
    }
}

/// Create the data directory layout
pub fn init(config_path: &Path) -> CliResult<Value> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if data_dir.join(MARKER_FILE).exists() {
        return Err(CliError::AlreadyInitialized(data_dir.to_path_buf()));
    }

    fs::create_dir_all(data_dir)?;
    fs::write(data_dir.join(MARKER_FILE), b"")?;

    Ok(json!({ "data_dir": config.data_dir }))
}

/// Store one record read from `file` or stdin
pub fn put(config_path: &Path, file: Option<&Path>) -> CliResult<Value> {
    let storage = open_storage(config_path)?;
    let record: StoredSchema = serde_json::from_value(read_record(file)?)?;

    storage.store(&OpContext::background(), &record)?;

    Ok(json!({ "id": record.id }))
}

pub fn get(config_path: &Path, id: &str) -> CliResult<Value> {
    let storage = open_storage(config_path)?;
    let record = storage.get(&OpContext::background(), id)?;
    Ok(serde_json::to_value(record)?)
}

pub fn list(config_path: &Path) -> CliResult<Value> {
    let storage = open_storage(config_path)?;
    let records = storage.list(&OpContext::background())?;
    Ok(serde_json::to_value(records)?)
}

pub fn delete(config_path: &Path, id: &str) -> CliResult<Value> {
    let storage = open_storage(config_path)?;
    storage.delete(&OpContext::background(), id)?;
    Ok(json!({ "id": id }))
}

fn open_storage(config_path: &Path) -> CliResult<SchemaStorage> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if !data_dir.join(MARKER_FILE).exists() {
        return Err(CliError::NotInitialized(data_dir.to_path_buf()));
    }

    let backend = LocalStore::new(data_dir).with_sync_writes(config.sync_writes);
    let observer = LoggingObserver::new(Logger::stderr(config.log_severity()));

    Ok(SchemaStorage::builder()
        .backend(Arc::new(backend))
        .observer(Arc::new(observer))
        .build()?)
}
