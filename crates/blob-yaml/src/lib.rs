//! YAML text in and out of blob trees.
//!
//! Parsing is event driven on top of `saphyr-parser`. Plain scalars are
//! typed: `null`, `~`, `nil`, `none` and the empty scalar are null;
//! `true`/`yes`/`on`/`y` and their negatives are booleans; integers and
//! finite floats are numbers. Quoted and block scalars stay strings.
//! Anchored nodes are shared by their aliases. Only the first document of
//! a stream is read.
//!
//! Output is block style. Strings that would read back as something else
//! are double-quoted.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use blob_core::{Blob, Key, Mapping, Node, NodeKind, Scalar, Sequence};
use saphyr_parser::{Event, Parser, ScalarStyle, Span, SpannedEventReceiver};
use serde_json::Number;
use thiserror::Error;
use tracing::trace;

mod emit;

pub use emit::to_yaml;

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("invalid YAML: {0}")]
    Syntax(String),
    #[error("alias at offset {offset} names no anchor seen so far")]
    UnknownAlias { offset: usize },
    #[error("mapping key at offset {offset} is a {kind}; keys must be scalars")]
    ComplexKey { offset: usize, kind: NodeKind },
    #[error(transparent)]
    Io(#[from] io::Error),
}

// ── Reading ───────────────────────────────────────────────────────────────

/// Parses YAML text into a tree. An empty stream is null.
///
/// # Errors
///
/// [`YamlError::Syntax`] when the scanner rejects the text, plus the
/// structural errors a tree cannot represent.
pub fn parse(text: &str) -> Result<Node, YamlError> {
    let mut builder = TreeBuilder::default();
    Parser::new_from_str(text)
        .load(&mut builder, false)
        .map_err(|e| YamlError::Syntax(e.to_string()))?;
    if let Some(err) = builder.error {
        return Err(err);
    }
    Ok(builder.root.unwrap_or_else(Node::null))
}

/// Parses YAML text into a standalone blob.
pub fn parse_blob(text: &str) -> Result<Blob, YamlError> {
    parse(text).map(Blob::from_node)
}

/// Reads a whole stream and parses its first document.
pub fn from_reader<R: Read>(mut reader: R) -> Result<Blob, YamlError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_blob(&text)
}

pub fn read_file(path: impl AsRef<Path>) -> Result<Blob, YamlError> {
    parse_blob(&fs::read_to_string(path)?)
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, Node>,
    root: Option<Node>,
    error: Option<YamlError>,
}

enum Frame {
    Mapping {
        map: Mapping,
        key: Option<Key>,
        anchor: usize,
    },
    Sequence {
        items: Sequence,
        anchor: usize,
    },
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>, offset: usize) -> Result<(), YamlError> {
        match event {
            Event::Scalar(value, style, anchor, _tag) => {
                self.finish(Node::Scalar(scalar(&value, style)), anchor, offset)
            }
            Event::Alias(id) => {
                let node = self
                    .anchors
                    .get(&id)
                    .cloned()
                    .ok_or(YamlError::UnknownAlias { offset })?;
                self.push(node, offset)
            }
            Event::SequenceStart(anchor, _tag) => {
                self.stack.push(Frame::Sequence {
                    items: Sequence::new(),
                    anchor,
                });
                Ok(())
            }
            Event::MappingStart(anchor, _tag) => {
                self.stack.push(Frame::Mapping {
                    map: Mapping::new(),
                    key: None,
                    anchor,
                });
                Ok(())
            }
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence { items, anchor }) => {
                    self.finish(Node::from(items), anchor, offset)
                }
                Some(Frame::Mapping { map, anchor, .. }) => {
                    self.finish(Node::from(map), anchor, offset)
                }
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Records a completed node under its anchor, then places it.
    fn finish(&mut self, node: Node, anchor: usize, offset: usize) -> Result<(), YamlError> {
        if anchor != 0 {
            trace!(target: "blob::yaml", anchor, kind = %node.kind(), "anchored node");
            self.anchors.insert(anchor, node.clone());
        }
        self.push(node, offset)
    }

    fn push(&mut self, node: Node, offset: usize) -> Result<(), YamlError> {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { map, key, .. }) => match key.take() {
                Some(k) => {
                    map.insert(k, node);
                }
                None => match node {
                    Node::Scalar(k) => *key = Some(k),
                    other => {
                        return Err(YamlError::ComplexKey {
                            offset,
                            kind: other.kind(),
                        })
                    }
                },
            },
        }
        Ok(())
    }
}

impl SpannedEventReceiver<'_> for TreeBuilder {
    fn on_event(&mut self, event: Event<'_>, span: Span) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.event(event, span.start.index()) {
            self.error = Some(err);
        }
    }
}

fn scalar(text: &str, style: ScalarStyle) -> Scalar {
    if !matches!(style, ScalarStyle::Plain) {
        return Scalar::String(text.to_string());
    }
    if is_null(text) {
        return Scalar::Null;
    }
    if let Some(b) = parse_bool(text) {
        return Scalar::Bool(b);
    }
    match parse_number(text) {
        Some(n) => Scalar::Number(n),
        None => Scalar::String(text.to_string()),
    }
}

pub(crate) fn is_null(text: &str) -> bool {
    matches!(
        text.to_lowercase().as_str(),
        "" | "~" | "null" | "nil" | "none"
    )
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "true" | "yes" | "on" | "y" => Some(true),
        "false" | "no" | "off" | "n" => Some(false),
        _ => None,
    }
}

/// Integers first so large ones stay exact; `inf` and `nan` parse as
/// floats but have no number form and fall through to strings.
pub(crate) fn parse_number(text: &str) -> Option<Number> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(n.into());
    }
    if let Ok(n) = text.parse::<u64>() {
        return Some(n.into());
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

// ── Writing ───────────────────────────────────────────────────────────────

/// Serializes the blob's root; an empty blob is `null`.
pub fn serialize(blob: &Blob) -> String {
    to_yaml(&blob.root().unwrap_or_else(Node::null))
}

pub fn to_writer<W: Write>(blob: &Blob, mut writer: W) -> Result<(), YamlError> {
    writer.write_all(serialize(blob).as_bytes())?;
    Ok(())
}

/// Writes the blob to `path`, replacing any existing file.
pub fn write_file(blob: &Blob, path: impl AsRef<Path>) -> Result<(), YamlError> {
    let mut out = BufWriter::new(File::create(path)?);
    to_writer(blob, &mut out)?;
    out.flush()?;
    Ok(())
}
