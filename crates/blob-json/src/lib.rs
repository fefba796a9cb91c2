//! JSON text in and out of blob trees.
//!
//! Objects become mappings with string keys in document order, arrays
//! become sequences, everything else a scalar. Sets have no JSON form and
//! are written as arrays; mapping keys that are not strings are written
//! with their display form.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use blob_core::{Blob, Key, Mapping, Node, Scalar};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod json_cli;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Builds a tree from a parsed JSON value.
pub fn from_value(value: Value) -> Node {
    match value {
        Value::Null => Node::null(),
        Value::Bool(b) => Node::from(b),
        Value::Number(n) => Node::from(n),
        Value::String(s) => Node::from(s),
        Value::Array(items) => Node::from_items(items.into_iter().map(from_value)),
        Value::Object(obj) => {
            let map: Mapping = obj
                .into_iter()
                .map(|(k, v)| (Key::from(k), from_value(v)))
                .collect();
            Node::from(map)
        }
    }
}

/// Converts a tree to a JSON value. Embedded blobs contribute their current
/// root, or `null` when empty.
pub fn to_value(node: &Node) -> Value {
    match node {
        Node::Scalar(s) => scalar_value(s),
        Node::Mapping(map) => {
            let obj: Map<String, Value> = map
                .borrow()
                .iter()
                .map(|(k, v)| (key_text(k), to_value(v)))
                .collect();
            Value::Object(obj)
        }
        Node::Sequence(seq) => Value::Array(seq.borrow().iter().map(to_value).collect()),
        Node::Set(set) => Value::Array(set.borrow().iter().map(scalar_value).collect()),
        Node::Blob(blob) => blob.root().map_or(Value::Null, |root| to_value(&root)),
    }
}

fn scalar_value(s: &Scalar) -> Value {
    match s {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Number(n) => Value::Number(n.clone()),
        Scalar::String(s) => Value::String(s.clone()),
    }
}

fn key_text(key: &Key) -> String {
    match key {
        Scalar::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parses JSON text into a tree.
///
/// # Errors
///
/// [`JsonError::Syntax`] when `text` is not valid JSON.
pub fn parse(text: &str) -> Result<Node, JsonError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(from_value(value))
}

/// Parses JSON text into a standalone blob.
pub fn parse_blob(text: &str) -> Result<Blob, JsonError> {
    parse(text).map(Blob::from_node)
}

/// Serializes the blob's root; an empty blob is `null`.
pub fn serialize(blob: &Blob) -> Result<String, JsonError> {
    Ok(serde_json::to_string(&root_value(blob))?)
}

pub fn serialize_pretty(blob: &Blob) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(&root_value(blob))?)
}

/// Reads a whole stream and parses it as one JSON document.
pub fn from_reader<R: Read>(mut reader: R) -> Result<Blob, JsonError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_blob(&text)
}

pub fn read_file(path: impl AsRef<Path>) -> Result<Blob, JsonError> {
    parse_blob(&fs::read_to_string(path)?)
}

/// Writes the pretty form followed by a newline.
pub fn to_writer<W: Write>(blob: &Blob, mut writer: W) -> Result<(), JsonError> {
    writer.write_all(serialize_pretty(blob)?.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Writes the blob to `path`, replacing any existing file.
pub fn write_file(blob: &Blob, path: impl AsRef<Path>) -> Result<(), JsonError> {
    let mut out = BufWriter::new(File::create(path)?);
    to_writer(blob, &mut out)?;
    out.flush()?;
    Ok(())
}

fn root_value(blob: &Blob) -> Value {
    blob.root().map_or(Value::Null, |root| to_value(&root))
}
