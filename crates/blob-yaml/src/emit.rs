//! Block-style YAML emitter.

use std::fmt::Write as _;

use blob_core::{Node, Scalar};

use crate::{is_null, parse_bool, parse_number};

const INDENT: usize = 2;

/// Renders a tree as a YAML document ending in a newline.
///
/// Non-empty containers are written in block style, empty ones as `{}` and
/// `[]`. Sets are written as sequences. Embedded blobs contribute their
/// current root, or `null` when empty.
///
/// ```
/// use blob_core::Node;
///
/// let node = Node::from_entries([("name", Node::from("svc")), ("port", Node::from(80))]);
/// assert_eq!(blob_yaml::to_yaml(&node), "name: svc\nport: 80\n");
/// ```
pub fn to_yaml(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0, false);
    out
}

fn flatten(node: &Node) -> Node {
    match node {
        Node::Blob(blob) => blob.root().unwrap_or_else(Node::null),
        other => other.clone(),
    }
}

fn is_block(node: &Node) -> bool {
    node.is_container() && node.size() > 0
}

/// Writes `node` at `indent`. With `inline` the cursor already sits after a
/// `- ` at that indent, so the first line gets no padding.
fn write_node(out: &mut String, node: &Node, indent: usize, inline: bool) {
    let node = flatten(node);
    if !is_block(&node) {
        write_inline(out, &node);
        out.push('\n');
        return;
    }
    match &node {
        Node::Mapping(map) => {
            for (i, (key, value)) in map.borrow().iter().enumerate() {
                if i > 0 || !inline {
                    pad(out, indent);
                }
                write_scalar(out, key);
                out.push(':');
                let value = flatten(value);
                out.push(if is_block(&value) { '\n' } else { ' ' });
                write_node(out, &value, indent + INDENT, false);
            }
        }
        Node::Sequence(seq) => {
            for (i, item) in seq.borrow().iter().enumerate() {
                if i > 0 || !inline {
                    pad(out, indent);
                }
                out.push_str("- ");
                write_node(out, item, indent + INDENT, true);
            }
        }
        Node::Set(set) => {
            for (i, member) in set.borrow().iter().enumerate() {
                if i > 0 || !inline {
                    pad(out, indent);
                }
                out.push_str("- ");
                write_scalar(out, member);
                out.push('\n');
            }
        }
        Node::Scalar(_) | Node::Blob(_) => unreachable!("flattened scalar written as block"),
    }
}

fn write_inline(out: &mut String, node: &Node) {
    match node {
        Node::Scalar(s) => write_scalar(out, s),
        Node::Mapping(_) => out.push_str("{}"),
        Node::Sequence(_) | Node::Set(_) => out.push_str("[]"),
        Node::Blob(_) => out.push_str("null"),
    }
}

fn pad(out: &mut String, indent: usize) {
    out.push_str(&" ".repeat(indent));
}

fn write_scalar(out: &mut String, scalar: &Scalar) {
    match scalar {
        Scalar::Null => out.push_str("null"),
        Scalar::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Scalar::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Scalar::String(s) if needs_quotes(s) => write_quoted(out, s),
        Scalar::String(s) => out.push_str(s),
    }
}

/// True when a plain rendering of `s` would not read back as the same
/// string, here or in a YAML 1.1 reader.
fn needs_quotes(s: &str) -> bool {
    const INDICATORS: &[char] = &[
        '-', '?', '*', '&', '!', '|', '>', '%', '@', '`', '[', '{', ']', '}', ',', '\'', '"',
    ];
    s.is_empty()
        || s.contains(": ")
        || s.ends_with(':')
        || s.contains(" #")
        || s.starts_with('#')
        || s.starts_with(INDICATORS)
        || s.starts_with(' ')
        || s.ends_with(' ')
        || s.starts_with("...")
        || s.chars().any(char::is_control)
        || is_null(s)
        || parse_bool(s).is_some()
        || looks_like_number(s)
}

fn looks_like_number(s: &str) -> bool {
    let lower = s.to_lowercase();
    parse_number(s).is_some()
        || lower.parse::<f64>().is_ok()
        || matches!(lower.as_str(), ".inf" | "+.inf" | "-.inf" | ".nan")
        || lower.starts_with("0x")
        || lower.starts_with("0o")
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use blob_core::{path, Blob};

    #[test]
    fn test_nested_layout() {
        let blob = Blob::new();
        blob.put(&path!["name"], "svc");
        blob.put(&path!["ports", 0], 80);
        blob.put(&path!["ports", 1], 443);
        blob.put(&path!["env", "debug"], true);
        blob.put(&path!["env", "level"], Node::null());
        blob.put(&path!["hosts", 0, "addr"], "a");
        blob.put(&path!["hosts", 0, "up"], false);
        blob.put(&path!["grid", 0, 0], 1);
        blob.put(&path!["grid", 0, 1], 2);
        blob.put(&path!["empty"], Node::mapping());
        assert_eq!(
            to_yaml(&blob.root().unwrap()),
            concat!(
                "name: svc\n",
                "ports:\n",
                "  - 80\n",
                "  - 443\n",
                "env:\n",
                "  debug: true\n",
                "  level: null\n",
                "hosts:\n",
                "  - addr: a\n",
                "    up: false\n",
                "grid:\n",
                "  - - 1\n",
                "    - 2\n",
                "empty: {}\n",
            )
        );
    }

    #[test]
    fn test_root_forms() {
        assert_eq!(to_yaml(&Node::from(3)), "3\n");
        assert_eq!(to_yaml(&Node::null()), "null\n");
        assert_eq!(to_yaml(&Node::sequence()), "[]\n");
        assert_eq!(to_yaml(&Node::from_members(["a"])), "- a\n");
        assert_eq!(to_yaml(&Node::from(Blob::new())), "null\n");
    }

    #[test]
    fn test_ambiguous_strings_are_quoted() {
        let cases = [
            ("", "\"\""),
            ("yes", "\"yes\""),
            ("Null", "\"Null\""),
            ("12", "\"12\""),
            ("1e3", "\"1e3\""),
            (".inf", "\".inf\""),
            ("a: b", "\"a: b\""),
            ("- item", "\"- item\""),
            ("two\nlines", "\"two\\nlines\""),
            ("say \"hi\"", "say \"hi\""),
            ("plain text", "plain text"),
            ("http://x", "http://x"),
        ];
        for (text, expected) in cases {
            let mut out = String::new();
            write_scalar(&mut out, &Scalar::from(text));
            assert_eq!(out, expected, "{text:?}");
        }
    }
}
