//! Typed getters layered over [`Blob::get`].

use serde_json::Number;

use crate::blob::Blob;
use crate::error::BlobError;
use crate::key::{Key, Scalar};
use crate::node::{MapRef, Node, SeqRef, SetRef};

/// Conversion from a stored node into a caller-facing type.
pub trait FromNode: Sized {
    /// What a usable value looks like, for error messages. `None` means any
    /// defined value is usable.
    const EXPECTED: Option<&'static str>;

    fn from_node(node: &Node) -> Option<Self>;
}

impl FromNode for Node {
    const EXPECTED: Option<&'static str> = None;

    /// Anything but a stored null.
    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Scalar(Scalar::Null) => None,
            other => Some(other.clone()),
        }
    }
}

impl FromNode for String {
    const EXPECTED: Option<&'static str> = Some("not a string");

    fn from_node(node: &Node) -> Option<Self> {
        node.as_str().map(str::to_string)
    }
}

impl FromNode for bool {
    const EXPECTED: Option<&'static str> = Some("not interpretable as a boolean");

    fn from_node(node: &Node) -> Option<Self> {
        match node.as_scalar()? {
            Scalar::Bool(b) => Some(*b),
            Scalar::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
            Scalar::String(s) => parse_bool(s),
            Scalar::Null => None,
        }
    }
}

/// `y`/`yes`/`t`/`true` and `n`/`no`/`f`/`false`, any case. The empty string
/// is false; other text is not a boolean.
fn parse_bool(s: &str) -> Option<bool> {
    const TRUTHY: [&str; 4] = ["y", "yes", "t", "true"];
    const FALSY: [&str; 5] = ["", "n", "no", "f", "false"];
    if TRUTHY.iter().any(|t| s.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSY.iter().any(|f| s.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

fn number(node: &Node) -> Option<&Number> {
    node.as_scalar()?.as_number()
}

/// Integer view of a number; fractional values truncate toward zero.
fn integer(node: &Node) -> Option<i64> {
    let n = number(node)?;
    n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))
}

impl FromNode for i64 {
    const EXPECTED: Option<&'static str> = Some("not interpretable as a long integer");

    fn from_node(node: &Node) -> Option<Self> {
        integer(node)
    }
}

impl FromNode for i32 {
    const EXPECTED: Option<&'static str> = Some("not interpretable as an integer");

    fn from_node(node: &Node) -> Option<Self> {
        integer(node).and_then(|i| i32::try_from(i).ok())
    }
}

impl FromNode for u64 {
    const EXPECTED: Option<&'static str> = Some("not interpretable as an unsigned integer");

    fn from_node(node: &Node) -> Option<Self> {
        let n = number(node)?;
        n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0)
                .map(|f| f as u64)
        })
    }
}

impl FromNode for f64 {
    const EXPECTED: Option<&'static str> = Some("not interpretable as a double");

    fn from_node(node: &Node) -> Option<Self> {
        number(node)?.as_f64()
    }
}

impl FromNode for f32 {
    const EXPECTED: Option<&'static str> = Some("not interpretable as a float");

    fn from_node(node: &Node) -> Option<Self> {
        number(node)?.as_f64().map(|f| f as f32)
    }
}

impl FromNode for MapRef {
    const EXPECTED: Option<&'static str> = Some("not a mapping");

    fn from_node(node: &Node) -> Option<Self> {
        node.as_mapping().cloned()
    }
}

impl FromNode for SeqRef {
    const EXPECTED: Option<&'static str> = Some("not a sequence");

    fn from_node(node: &Node) -> Option<Self> {
        node.as_sequence().cloned()
    }
}

impl FromNode for SetRef {
    const EXPECTED: Option<&'static str> = Some("not a set");

    fn from_node(node: &Node) -> Option<Self> {
        node.as_set().cloned()
    }
}

impl Blob {
    pub fn get_as<T: FromNode>(&self, path: &[Key]) -> Option<T> {
        self.get(path).as_ref().and_then(T::from_node)
    }

    pub fn get_or<T: FromNode>(&self, path: &[Key], default: T) -> T {
        self.get_as(path).unwrap_or(default)
    }

    /// Like [`Blob::get_as`], but a missing or unusable value is an error
    /// naming the full key path, including the positions of ancestor slices.
    ///
    /// # Errors
    ///
    /// [`BlobError::Undefined`] or [`BlobError::Uninterpretable`], depending
    /// on whether `T` accepts any defined value.
    pub fn require<T: FromNode>(&self, path: &[Key]) -> Result<T, BlobError> {
        self.get_as(path).ok_or_else(|| {
            let path = self.format_keys(true, path);
            match T::EXPECTED {
                None => BlobError::Undefined { path },
                Some(reason) => BlobError::Uninterpretable { path, reason },
            }
        })
    }

    pub fn get_str(&self, path: &[Key]) -> Option<String> {
        self.get_as(path)
    }

    /// Best-effort boolean: booleans, non-zero numbers and the usual yes/no
    /// words. See [`FromNode for bool`](FromNode).
    pub fn get_bool(&self, path: &[Key]) -> Option<bool> {
        self.get_as(path)
    }

    pub fn get_i64(&self, path: &[Key]) -> Option<i64> {
        self.get_as(path)
    }

    pub fn get_f64(&self, path: &[Key]) -> Option<f64> {
        self.get_as(path)
    }

    pub fn get_map(&self, path: &[Key]) -> Option<MapRef> {
        self.get_as(path)
    }

    pub fn get_seq(&self, path: &[Key]) -> Option<SeqRef> {
        self.get_as(path)
    }

    pub fn get_set(&self, path: &[Key]) -> Option<SetRef> {
        self.get_as(path)
    }
}
