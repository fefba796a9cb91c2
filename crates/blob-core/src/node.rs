//! The tagged representation of a tree location.
//!
//! Containers are shared handles (`Rc<RefCell<..>>`): cloning a [`Node`]
//! aliases the container instead of copying it, which is what lets a slice
//! and its parent observe each other's writes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Number;

use crate::blob::Blob;
use crate::key::{Key, Scalar};

pub type Mapping = IndexMap<Key, Node>;
pub type Sequence = Vec<Node>;
pub type Set = IndexSet<Key>;

pub type MapRef = Rc<RefCell<Mapping>>;
pub type SeqRef = Rc<RefCell<Sequence>>;
pub type SetRef = Rc<RefCell<Set>>;

/// A value occupying a tree location.
#[derive(Clone)]
pub enum Node {
    Scalar(Scalar),
    Mapping(MapRef),
    Sequence(SeqRef),
    Set(SetRef),
    /// A nested blob; every operation sees through it to its current root.
    Blob(Blob),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Mapping,
    Sequence,
    Set,
    Blob,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::Set => "set",
            NodeKind::Blob => "blob",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn mapping() -> Self {
        Node::Mapping(Rc::new(RefCell::new(Mapping::new())))
    }

    pub fn sequence() -> Self {
        Node::Sequence(Rc::new(RefCell::new(Sequence::new())))
    }

    pub fn set() -> Self {
        Node::Set(Rc::new(RefCell::new(Set::new())))
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Key>,
        V: Into<Node>,
    {
        let map: Mapping = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Node::Mapping(Rc::new(RefCell::new(map)))
    }

    pub fn from_items<V: Into<Node>>(items: impl IntoIterator<Item = V>) -> Self {
        let seq: Sequence = items.into_iter().map(Into::into).collect();
        Node::Sequence(Rc::new(RefCell::new(seq)))
    }

    pub fn from_members<K: Into<Key>>(members: impl IntoIterator<Item = K>) -> Self {
        let set: Set = members.into_iter().map(Into::into).collect();
        Node::Set(Rc::new(RefCell::new(set)))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Set(_) => NodeKind::Set,
            Node::Blob(_) => NodeKind::Blob,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Mapping(_) | Node::Sequence(_) | Node::Set(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_mapping(&self) -> Option<&MapRef> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SeqRef> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetRef> {
        match self {
            Node::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Replaces nested blob references with their current roots.
    ///
    /// Returns `None` when the chain ends in an empty blob.
    pub fn deblob(self) -> Option<Node> {
        let mut node = self;
        loop {
            match node {
                Node::Blob(blob) => node = blob.root()?,
                other => return Some(other),
            }
        }
    }

    /// Identity comparison: true when both nodes are the same container
    /// handle (or equal scalars).
    pub fn same(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Mapping(a), Node::Mapping(b)) => Rc::ptr_eq(a, b),
            (Node::Sequence(a), Node::Sequence(b)) => Rc::ptr_eq(a, b),
            (Node::Set(a), Node::Set(b)) => Rc::ptr_eq(a, b),
            (Node::Blob(a), Node::Blob(b)) => a.ptr_eq(b),
            (Node::Scalar(a), Node::Scalar(b)) => a == b,
            _ => false,
        }
    }

    /// Element count; zero for scalars.
    pub fn size(&self) -> usize {
        match self {
            Node::Scalar(_) => 0,
            Node::Mapping(m) => m.borrow().len(),
            Node::Sequence(s) => s.borrow().len(),
            Node::Set(s) => s.borrow().len(),
            Node::Blob(b) => b.root().map_or(0, |root| root.size()),
        }
    }

    /// Mapping key presence or sequence index bounds. Sets have no keys.
    pub fn contains_key(&self, key: &Key) -> bool {
        match self {
            Node::Mapping(m) => m.borrow().contains_key(key),
            Node::Sequence(s) => key.as_index().is_some_and(|i| i < s.borrow().len()),
            Node::Set(_) | Node::Scalar(_) => false,
            Node::Blob(b) => b.root().is_some_and(|root| root.contains_key(key)),
        }
    }

    /// Mapping value presence, sequence element presence or set membership.
    pub fn contains_value(&self, value: &Node) -> bool {
        match self {
            Node::Mapping(m) => m.borrow().values().any(|v| v == value),
            Node::Sequence(s) => s.borrow().iter().any(|v| v == value),
            Node::Set(s) => match value {
                Node::Scalar(member) => s.borrow().contains(member),
                _ => false,
            },
            Node::Scalar(_) => false,
            Node::Blob(b) => b.root().is_some_and(|root| root.contains_value(value)),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Blob(_), _) | (_, Node::Blob(_)) => {
                // An empty blob compares like a stored null.
                let a = self.clone().deblob().unwrap_or_else(Node::null);
                let b = other.clone().deblob().unwrap_or_else(Node::null);
                a == b
            }
            (Node::Scalar(a), Node::Scalar(b)) => a == b,
            (Node::Mapping(a), Node::Mapping(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Node::Sequence(a), Node::Sequence(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Node::Set(a), Node::Set(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(s) => write!(f, "{s:?}"),
            Node::Mapping(m) => f.debug_map().entries(m.borrow().iter()).finish(),
            Node::Sequence(s) => f.debug_list().entries(s.borrow().iter()).finish(),
            Node::Set(s) => f.debug_set().entries(s.borrow().iter()).finish(),
            Node::Blob(b) => write!(f, "{b:?}"),
        }
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<Blob> for Node {
    fn from(b: Blob) -> Self {
        Node::Blob(b)
    }
}

impl From<&Blob> for Node {
    fn from(b: &Blob) -> Self {
        Node::Blob(b.clone())
    }
}

impl From<Sequence> for Node {
    fn from(items: Sequence) -> Self {
        Node::Sequence(Rc::new(RefCell::new(items)))
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(Rc::new(RefCell::new(map)))
    }
}

impl From<Set> for Node {
    fn from(set: Set) -> Self {
        Node::Set(Rc::new(RefCell::new(set)))
    }
}

macro_rules! node_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Node {
                fn from(v: $t) -> Self {
                    Node::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

node_from_scalar!(
    bool, &str, String, &String, Number, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32,
    f64
);
