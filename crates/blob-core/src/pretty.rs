//! Indented debug rendering of a blob.
//!
//! Mappings print `key: value`, sequence items `- item`, set members
//! `? member`. Empty containers print as `{}`, `[]` and `<>`.

use std::fmt::{self, Write};

use crate::blob::Blob;
use crate::node::Node;

const INDENT: &str = "  ";

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_blob(f, self, "")
    }
}

fn write_blob<W: Write>(out: &mut W, blob: &Blob, indent: &str) -> fmt::Result {
    write!(out, "{indent}Blob: ")?;
    write_node(out, blob.root().as_ref(), &format!("{indent}{INDENT}"))
}

fn write_node<W: Write>(out: &mut W, node: Option<&Node>, indent: &str) -> fmt::Result {
    let child_indent = format!("{indent}{INDENT}");
    match node {
        None => out.write_str("null\n"),
        Some(Node::Scalar(s)) => writeln!(out, "{s}"),
        Some(Node::Mapping(map)) => {
            let map = map.borrow();
            if map.is_empty() {
                return out.write_str("{}\n");
            }
            out.write_char('\n')?;
            for (key, value) in map.iter() {
                write!(out, "{indent}{key}: ")?;
                write_node(out, Some(value), &child_indent)?;
            }
            Ok(())
        }
        Some(Node::Sequence(seq)) => {
            let seq = seq.borrow();
            if seq.is_empty() {
                return out.write_str("[]\n");
            }
            out.write_char('\n')?;
            for item in seq.iter() {
                write!(out, "{indent}- ")?;
                write_node(out, Some(item), &child_indent)?;
            }
            Ok(())
        }
        Some(Node::Set(set)) => {
            let set = set.borrow();
            if set.is_empty() {
                return out.write_str("<>\n");
            }
            out.write_char('\n')?;
            for member in set.iter() {
                writeln!(out, "{indent}? {member}")?;
            }
            Ok(())
        }
        Some(Node::Blob(inner)) => {
            out.write_char('\n')?;
            write_blob(out, inner, &child_indent)
        }
    }
}
