//! `blob-path`: apply one blob operation to a JSON document.
//!
//! Provides the logic behind the binary entry point: argument parsing, the
//! operation itself, and log setup.

use blob_core::pointer::parse_pointer;
use blob_core::{Blob, BlobError, Key, Node};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, Level};

use crate::{from_value, parse_blob, scalar_value, serialize_pretty, to_value, JsonError};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(JsonError::Syntax(e))
    }
}

pub const USAGE: &str = "usage: blob-path [-v] <get|put|add|remove|keys|size> <pointer> [value]";

// ── Commands ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get(Vec<Key>),
    Put(Vec<Key>, Value),
    Add(Vec<Key>, Value),
    Remove(Vec<Key>),
    Keys(Vec<Key>),
    Size(Vec<Key>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub verbose: bool,
    pub command: Command,
}

/// Parses arguments (without the program name).
///
/// A value argument that is not valid JSON is taken as a plain string, so
/// `put /name alice` works without quoting.
pub fn parse_args<I, S>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut verbose = false;
    let mut positional = Vec::new();
    for arg in args {
        let arg = arg.into();
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ => positional.push(arg),
        }
    }

    let mut it = positional.into_iter();
    let (Some(op), Some(pointer)) = (it.next(), it.next()) else {
        return Err(CliError::Usage(USAGE.to_string()));
    };
    let path = parse_pointer(&pointer);
    let value = it.next().map(|raw| {
        serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw))
    });
    if it.next().is_some() {
        return Err(CliError::Usage(USAGE.to_string()));
    }

    let command = match (op.as_str(), value) {
        ("get", None) => Command::Get(path),
        ("put", Some(v)) => Command::Put(path, v),
        ("add", Some(v)) => Command::Add(path, v),
        ("remove", None) => Command::Remove(path),
        ("keys", None) => Command::Keys(path),
        ("size", None) => Command::Size(path),
        _ => return Err(CliError::Usage(USAGE.to_string())),
    };
    Ok(Invocation { verbose, command })
}

/// Runs `command` against the JSON document `doc` and returns the JSON text
/// to print.
///
/// `get` prints the value (or `null`), `remove` the removed value, `keys`
/// an array of keys, `size` a number. `put` and `add` print the updated
/// document.
pub fn run(command: &Command, doc: &str) -> Result<String, CliError> {
    let blob = if doc.trim().is_empty() {
        Blob::new()
    } else {
        parse_blob(doc)?
    };
    debug!(target: "blob::cli", ?command, "running");

    let out = match command {
        Command::Get(path) => node_value(blob.get(path)),
        Command::Put(path, value) => {
            blob.put(path, from_value(value.clone()));
            return Ok(serialize_pretty(&blob)?);
        }
        Command::Add(path, value) => {
            let changed = blob.add(path, from_value(value.clone()))?;
            debug!(target: "blob::cli", changed, "add finished");
            return Ok(serialize_pretty(&blob)?);
        }
        Command::Remove(path) => node_value(blob.remove(path)),
        Command::Keys(path) => blob.key_set(path).map_or(Value::Null, |keys| {
            Value::Array(keys.iter().map(scalar_value).collect())
        }),
        Command::Size(path) => Value::from(blob.size(path)),
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

fn node_value(node: Option<Node>) -> Value {
    node.as_ref().map_or(Value::Null, to_value)
}

/// Installs a stderr log subscriber: warnings only, or debug with `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(true)
        .init();
}
