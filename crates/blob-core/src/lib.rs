//! Path-addressable access to loosely-typed trees.
//!
//! A [`Blob`] holds a tree of mappings, sequences, sets and scalars, the
//! shape produced by parsing JSON or YAML. Every read and write takes a flat
//! key path; writes create missing containers and convert incompatible ones
//! on the way down.
//!
//! ```
//! use blob_core::{path, Blob, Node};
//!
//! let blob = Blob::new();
//! blob.put(&path!["servers", 0, "host"], "alpha");
//! blob.add(&path!["servers", 0, "tags"], "primary").unwrap();
//!
//! assert_eq!(blob.get_str(&path!["servers", 0, "host"]).as_deref(), Some("alpha"));
//! assert!(blob.contains_value(&path!["servers", 0, "tags"], "primary"));
//!
//! // A slice is a live view; writes land in the parent.
//! let server = blob.slice(&path!["servers", 0]);
//! server.put(&path!["port"], 8080);
//! assert_eq!(blob.get(&path!["servers", 0, "port"]), Some(Node::from(8080)));
//! ```

pub mod accessors;
pub mod blob;
mod coerce;
pub mod error;
pub mod key;
mod materialize;
pub mod node;
pub mod pointer;
mod pretty;
pub mod resolve;
mod views;

pub use accessors::FromNode;
pub use blob::Blob;
pub use coerce::PAD_LIMIT;
pub use error::BlobError;
pub use key::{Key, Scalar};
pub use node::{MapRef, Mapping, Node, NodeKind, SeqRef, Sequence, Set, SetRef};
pub use resolve::resolve;

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
