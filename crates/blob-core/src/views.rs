//! Key, entry and value projections of the container at a path.
//!
//! Each call snapshots the container's current contents. The returned
//! nodes still share their own containers with the tree.

use crate::blob::Blob;
use crate::key::Key;
use crate::node::Node;

impl Blob {
    /// Keys of the mapping at `path`, or indices `0..len` of a sequence.
    ///
    /// `None` for sets (members have no key), scalars and absent paths.
    pub fn key_set(&self, path: &[Key]) -> Option<Vec<Key>> {
        match self.get(path)? {
            Node::Mapping(map) => Some(map.borrow().keys().cloned().collect()),
            Node::Sequence(seq) => Some((0..seq.borrow().len()).map(Key::from).collect()),
            _ => None,
        }
    }

    /// Key/value pairs of the mapping at `path`, or index/element pairs of
    /// a sequence. `None` for anything else.
    pub fn entry_set(&self, path: &[Key]) -> Option<Vec<(Key, Node)>> {
        match self.get(path)? {
            Node::Mapping(map) => Some(
                map.borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            Node::Sequence(seq) => Some(
                seq.borrow()
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (Key::from(i), v.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Values of the mapping, elements of the sequence, or members of the
    /// set at `path`.
    pub fn values(&self, path: &[Key]) -> Option<Vec<Node>> {
        match self.get(path)? {
            Node::Mapping(map) => Some(map.borrow().values().cloned().collect()),
            Node::Sequence(seq) => Some(seq.borrow().clone()),
            Node::Set(set) => Some(set.borrow().iter().cloned().map(Node::Scalar).collect()),
            Node::Scalar(_) | Node::Blob(_) => None,
        }
    }
}
