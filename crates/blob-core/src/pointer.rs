//! Text form of key paths, in the style of JSON Pointer (RFC 6901).
//!
//! `/servers/0/port` is the path `["servers", 0, "port"]`. A token that is
//! a canonical unsigned integer (`0`, `17`, but not `017`) becomes an
//! integer key; every other token is a string key. `~1` and `~0` escape `/`
//! and `~` inside a token.

use crate::key::{Key, Scalar};

/// Decodes one pointer token into a key.
///
/// Digits without a leading zero that fit a `u64` index a sequence.
/// Anything else is a string key with `~1` and `~0` decoded in a single
/// pass, so `~01` is `~1` and not `/`. A `~` followed by anything else is
/// kept as written.
fn token_key(token: &str) -> Key {
    let canonical = match token.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        digits => digits.iter().all(u8::is_ascii_digit),
    };
    if canonical {
        if let Ok(index) = token.parse::<u64>() {
            return Key::from(index);
        }
    }

    let mut text = String::with_capacity(token.len());
    let mut chars = token.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('~', Some('0')) => {
                chars.next();
                text.push('~');
            }
            ('~', Some('1')) => {
                chars.next();
                text.push('/');
            }
            _ => text.push(c),
        }
    }
    Scalar::String(text)
}

/// Appends `/` and the encoded key to `out`.
fn push_token(out: &mut String, key: &Key) {
    out.push('/');
    let text = match key {
        Scalar::String(s) => s.clone(),
        other => other.to_string(),
    };
    for c in text.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            c => out.push(c),
        }
    }
}

/// Parses a pointer into a key path. The leading `/` is optional; the
/// empty string is the empty path.
///
/// ```
/// use blob_core::{path, pointer::parse_pointer};
///
/// assert_eq!(parse_pointer("/a/0/b~1c"), path!["a", 0, "b/c"]);
/// assert_eq!(parse_pointer("a/b"), path!["a", "b"]);
/// assert!(parse_pointer("").is_empty());
/// ```
pub fn parse_pointer(pointer: &str) -> Vec<Key> {
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    if pointer.is_empty() {
        return Vec::new();
    }
    body.split('/').map(token_key).collect()
}

/// Formats a key path as a pointer. Non-string keys use their display form,
/// so `Null` renders as `null` and will parse back as a string key.
pub fn format_pointer(path: &[Key]) -> String {
    let mut out = String::new();
    for key in path {
        push_token(&mut out, key);
    }
    out
}
