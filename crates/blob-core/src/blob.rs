//! The addressable root object and its live slices.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::BlobError;
use crate::key::{Key, Scalar};
use crate::materialize::{make_path, Target};
use crate::node::Node;
use crate::resolve::resolve;

/// A tree of nested mappings, sequences and sets addressed by key paths.
///
/// `Blob` is a cheap handle: clones share the same root. A blob returned by
/// [`Blob::slice`] is a live view rooted at a sub-path of its parent. Writes
/// through the slice land in the parent's containers, and whenever the slice
/// has to replace or clear its own root, the change is written back to the
/// parent at the slice's position.
///
/// Replacing or removing a prefix of a slice's position through the parent
/// leaves the slice pointing at detached data. Operations on such a slice
/// are not meaningful; callers must not rely on them.
///
/// Not thread-safe.
#[derive(Clone, Default)]
pub struct Blob {
    inner: Rc<BlobInner>,
}

#[derive(Default)]
struct BlobInner {
    /// Never holds a `Node::Blob`.
    root: RefCell<Option<Node>>,
    parent: Option<Blob>,
    position: Vec<Key>,
}

impl Blob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a standalone blob. A blob passed as the root is unwrapped and
    /// its containers are shared.
    pub fn from_node(root: impl Into<Node>) -> Self {
        Blob {
            inner: Rc::new(BlobInner {
                root: RefCell::new(rooted(root.into().deblob())),
                parent: None,
                position: Vec::new(),
            }),
        }
    }

    /// The current root node, if any.
    pub fn root(&self) -> Option<Node> {
        self.inner.root.borrow().clone()
    }

    /// The blob this one is a slice of.
    pub fn parent(&self) -> Option<&Blob> {
        self.inner.parent.as_ref()
    }

    /// The path at which this blob is a slice of its parent. Empty for a
    /// standalone blob.
    pub fn position(&self) -> &[Key] {
        &self.inner.position
    }

    pub fn ptr_eq(&self, other: &Blob) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Core operations ───────────────────────────────────────────────────

    /// Looks up the node at `path`.
    pub fn get(&self, path: &[Key]) -> Option<Node> {
        resolve(self.root(), path)
    }

    /// Writes `value` at `path`, creating or converting containers on the
    /// way, and returns the value previously stored there.
    ///
    /// With an empty path the root itself is replaced.
    pub fn put(&self, path: &[Key], value: impl Into<Node>) -> Option<Node> {
        let value = value.into().deblob();
        let (container, key) = match (make_path(self, path, false), path.last()) {
            (Target::Container(container), Some(key)) => (container, key),
            _ => return self.set_root(value),
        };
        let value = value.unwrap_or_else(Node::null);
        match container {
            Node::Mapping(map) => map.borrow_mut().insert(key.clone(), value),
            Node::Sequence(seq) => {
                let Some(idx) = key.as_index() else {
                    unreachable!("put reached a sequence with non-index key {key}");
                };
                let mut items = seq.borrow_mut();
                if idx < items.len() {
                    Some(std::mem::replace(&mut items[idx], value))
                } else {
                    items.resize(idx, Node::null());
                    items.push(value);
                    None
                }
            }
            other => unreachable!("put reached a {} container", other.kind()),
        }
    }

    /// Adds `value` to the container at `path` without naming a key.
    ///
    /// Sequences append, sets insert the value as a member, mappings store
    /// the value under itself. Returns whether the container changed.
    ///
    /// # Errors
    ///
    /// [`BlobError::UnhashableValue`] when the target is a mapping or set and
    /// `value` is a container. Containers along `path` have been created by
    /// then.
    pub fn add(&self, path: &[Key], value: impl Into<Node>) -> Result<bool, BlobError> {
        let value = value.into().deblob().unwrap_or_else(Node::null);
        let Target::Container(container) = make_path(self, path, true) else {
            unreachable!("a reserved slot always yields a container");
        };
        match container {
            Node::Mapping(map) => {
                let key = self.member_key(path, &value)?;
                let previous = map.borrow_mut().insert(key, value.clone());
                Ok(previous.as_ref() != Some(&value))
            }
            Node::Sequence(seq) => {
                seq.borrow_mut().push(value);
                Ok(true)
            }
            Node::Set(set) => {
                let key = self.member_key(path, &value)?;
                Ok(set.borrow_mut().insert(key))
            }
            other => unreachable!("add reached a {} container", other.kind()),
        }
    }

    /// Removes and returns whatever is stored at `path`.
    ///
    /// Mappings remove by key, sequences by in-range index (later elements
    /// shift down), sets by member. An empty path clears the root.
    pub fn remove(&self, path: &[Key]) -> Option<Node> {
        let Some((last, prefix)) = path.split_last() else {
            return self.set_root(None);
        };
        match self.get(prefix)? {
            Node::Mapping(map) => map.borrow_mut().shift_remove(last),
            Node::Sequence(seq) => {
                let idx = last.as_index()?;
                let mut items = seq.borrow_mut();
                (idx < items.len()).then(|| items.remove(idx))
            }
            Node::Set(set) => set
                .borrow_mut()
                .shift_remove(last)
                .then(|| Node::Scalar(last.clone())),
            Node::Scalar(_) | Node::Blob(_) => None,
        }
    }

    /// Clears the root. A slice also removes its value from the parent.
    pub fn clear(&self) {
        self.remove(&[]);
    }

    /// True when `path` names an existing mapping key or sequence index.
    /// The empty path asks whether the root is present.
    pub fn contains_key(&self, path: &[Key]) -> bool {
        match path.split_last() {
            None => self.root().is_some(),
            Some((last, prefix)) => self
                .get(prefix)
                .is_some_and(|container| container.contains_key(last)),
        }
    }

    /// True when the container at `path` holds `value` as a mapping value,
    /// sequence element or set member.
    pub fn contains_value(&self, path: &[Key], value: impl Into<Node>) -> bool {
        let value = value.into();
        self.get(path)
            .is_some_and(|container| container.contains_value(&value))
    }

    /// Element count of the container at `path`; zero for scalars and
    /// absent nodes.
    pub fn size(&self, path: &[Key]) -> usize {
        self.get(path).map_or(0, |node| node.size())
    }

    /// Returns a live view rooted at `path`.
    pub fn slice(&self, path: &[Key]) -> Blob {
        Blob {
            inner: Rc::new(BlobInner {
                root: RefCell::new(rooted(self.get(path))),
                parent: Some(self.clone()),
                position: path.to_vec(),
            }),
        }
    }

    /// Renders a key path joined by `:` for diagnostics. With `absolute`
    /// the positions of all ancestor slices are prepended.
    pub fn format_keys(&self, absolute: bool, path: &[Key]) -> String {
        let mut segments = Vec::new();
        if absolute {
            self.collect_position(&mut segments);
        }
        segments.extend(path.iter().map(format_key));
        segments.join(":")
    }

    // ── Root maintenance ──────────────────────────────────────────────────

    /// Replaces the root and returns the old one. A slice writes the new
    /// root back into its parent, or removes it there when cleared.
    pub(crate) fn set_root(&self, root: Option<Node>) -> Option<Node> {
        let root = rooted(root.and_then(Node::deblob));
        let unchanged = match (&*self.inner.root.borrow(), &root) {
            (Some(current), Some(next)) => current.same(next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return self.root();
        }

        let old = self.inner.root.replace(root.clone());
        if let Some(parent) = &self.inner.parent {
            trace!(
                target: "blob::slice",
                position = %self.format_keys(true, &[]),
                cleared = root.is_none(),
                "propagating root to parent"
            );
            match root {
                Some(node) => {
                    parent.put(&self.inner.position, node);
                }
                None => {
                    parent.remove(&self.inner.position);
                }
            }
        }
        old
    }

    fn member_key(&self, path: &[Key], value: &Node) -> Result<Key, BlobError> {
        value
            .as_scalar()
            .cloned()
            .ok_or_else(|| BlobError::UnhashableValue {
                path: self.format_keys(true, path),
                kind: value.kind(),
            })
    }

    fn collect_position(&self, out: &mut Vec<String>) {
        if let Some(parent) = &self.inner.parent {
            parent.collect_position(out);
            out.extend(self.inner.position.iter().map(format_key));
        }
    }
}

/// A null root is no root: storing null empties the blob.
fn rooted(root: Option<Node>) -> Option<Node> {
    root.filter(|node| !matches!(node, Node::Scalar(Scalar::Null)))
}

fn format_key(key: &Key) -> String {
    match key {
        Scalar::Null => "<null>".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("root", &*self.inner.root.borrow())
            .field("position", &self.inner.position)
            .finish()
    }
}

impl From<Node> for Blob {
    fn from(node: Node) -> Self {
        Blob::from_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::path;

    #[test]
    fn test_put_and_get() {
        let b = Blob::new();
        assert_eq!(b.put(&path!["a", "b", "c"], "happy"), None);
        b.put(&path!["b", 0, 2], "sad");

        assert_eq!(b.get(&path!["a", "b", "c"]), Some(Node::from("happy")));
        assert_eq!(b.get(&path!["b", 0, 2]), Some(Node::from("sad")));

        b.put(&path![], "oops");
        assert_eq!(b.get(&path![]), Some(Node::from("oops")));

        b.clear();
        b.put(&path![0, 0], "whatever");
        b.put(&path![0, "happy"], "whatevs");
        assert_eq!(b.get(&path![0, "happy"]), Some(Node::from("whatevs")));
        assert_eq!(b.get(&path![0, 0]), Some(Node::from("whatever")));
    }

    #[test]
    fn test_put_returns_previous() {
        let b = Blob::new();
        b.put(&path!["k"], 1);
        assert_eq!(b.put(&path!["k"], 2), Some(Node::from(1)));
        b.put(&path!["list", 0], "x");
        assert_eq!(b.put(&path!["list", 0], "y"), Some(Node::from("x")));
        assert_eq!(b.put(&path!["list", 3], "z"), None);
        assert_eq!(b.size(&path!["list"]), 4);
    }

    #[test]
    fn test_put_root_returns_old_root() {
        let b = Blob::from_node(Node::from(7));
        assert_eq!(b.put(&path![], 8), Some(Node::from(7)));
        assert_eq!(b.root(), Some(Node::from(8)));
    }

    #[test]
    fn test_sequence_padding() {
        let b = Blob::new();
        b.put(&path![0], "whatever");
        assert_eq!(b.size(&path![]), 1);
        b.put(&path![2], "killjoy");
        assert_eq!(b.size(&path![]), 3);
        assert_eq!(b.get(&path![1]), Some(Node::null()));

        b.put(&path![1_000_000], "tomap");
        assert_eq!(b.root().unwrap().kind(), NodeKind::Mapping);
        assert_eq!(b.size(&path![]), 4);
        assert_eq!(b.get(&path![2]), Some(Node::from("killjoy")));
        assert_eq!(b.get(&path![1_000_000]), Some(Node::from("tomap")));
    }

    #[test]
    fn test_add() {
        let b = Blob::new();
        assert_eq!(b.add(&path!["a", "b", "c"], "happy"), Ok(true));
        assert_eq!(b.add(&path!["a", "b"], "d"), Ok(true));
        assert_eq!(b.add(&path!["b", -1, 2], "sad"), Ok(true));

        assert_eq!(b.get(&path!["a", "b", "c", 0]), Some(Node::from("happy")));
        assert!(b.contains_key(&path!["a", "b", "d"]));
        assert!(b.contains_value(&path!["a", "b"], "d"));
        assert_eq!(b.get(&path!["b", -1, 2, 0]), Some(Node::from("sad")));
    }

    #[test]
    fn test_add_to_mapping_is_idempotent() {
        let b = Blob::from_node(Node::mapping());
        assert_eq!(b.add(&path![], "k"), Ok(true));
        assert_eq!(b.add(&path![], "k"), Ok(false));
        assert!(b.contains_key(&path!["k"]));
    }

    #[test]
    fn test_add_to_set() {
        let b = Blob::from_node(Node::from_entries([("tags", Node::set())]));
        assert_eq!(b.add(&path!["tags"], "red"), Ok(true));
        assert_eq!(b.add(&path!["tags"], "red"), Ok(false));
        assert_eq!(b.size(&path!["tags"]), 1);
        assert!(b.contains_value(&path!["tags"], "red"));
    }

    #[test]
    fn test_add_container_into_mapping_fails() {
        let b = Blob::from_node(Node::from_entries([("m", Node::mapping())]));
        let err = b.add(&path!["m"], Node::sequence()).unwrap_err();
        assert_eq!(
            err,
            BlobError::UnhashableValue {
                path: "m".to_string(),
                kind: NodeKind::Sequence
            }
        );
    }

    #[test]
    fn test_remove() {
        let b = Blob::new();
        b.put(&path!["a", "b", "c"], "happy");
        b.put(&path!["b", -1, 2], "sad");

        assert_eq!(b.remove(&path!["a", "b", "c"]), Some(Node::from("happy")));
        assert_eq!(b.remove(&path!["b", -1, 2]), Some(Node::from("sad")));
        assert_eq!(b.remove(&path!["a", "b", "c"]), None);
        assert_eq!(b.remove(&path!["b", "-1", 2]), None);
    }

    #[test]
    fn test_remove_from_sequence_shifts() {
        let b = Blob::from_node(Node::from_items(["x", "y", "z"]));
        assert_eq!(b.remove(&path![0]), Some(Node::from("x")));
        assert_eq!(b.get(&path![0]), Some(Node::from("y")));
        assert_eq!(b.remove(&path![5]), None);
        assert_eq!(b.remove(&path!["0"]), None);
    }

    #[test]
    fn test_remove_from_set() {
        let b = Blob::from_node(Node::from_members(["a", "b"]));
        assert_eq!(b.remove(&path!["a"]), Some(Node::from("a")));
        assert_eq!(b.remove(&path!["a"]), None);
        assert_eq!(b.size(&path![]), 1);
    }

    #[test]
    fn test_remove_root() {
        let b = Blob::from_node(Node::from(3));
        assert_eq!(b.remove(&path![]), Some(Node::from(3)));
        assert_eq!(b.root(), None);
        assert_eq!(b.remove(&path![]), None);
    }

    #[test]
    fn test_contains() {
        let b = Blob::new();
        b.put(&path!["a", "b", "c"], "happy");
        b.put(&path!["b", -1, 2], "sad");

        assert!(b.contains_key(&path!["a"]));
        assert!(b.contains_key(&path!["a", "b"]));
        assert!(b.contains_key(&path!["a", "b", "c"]));
        assert!(b.contains_key(&path!["b", -1]));
        assert!(!b.contains_value(&path![], "a"));
        assert!(b.contains_value(&path!["a", "b"], "happy"));
        assert!(b.contains_value(&path!["b", -1], "sad"));
    }

    #[test]
    fn test_contains_key_empty_path() {
        let b = Blob::new();
        assert!(!b.contains_key(&path![]));
        b.put(&path![], 1);
        assert!(b.contains_key(&path![]));
    }

    #[test]
    fn test_put_null_root_empties_blob() {
        let b = Blob::from_node(Node::from(1));
        assert_eq!(b.put(&path![], Node::null()), Some(Node::from(1)));
        assert_eq!(b.root(), None);
        assert!(!b.contains_key(&path![]));
        assert_eq!(b.put(&path![], Node::null()), None);

        let parent = Blob::from_node(Node::from_entries([("a", 1), ("b", 2)]));
        let slice = parent.slice(&path!["a"]);
        slice.put(&path![], Node::null());
        assert!(!parent.contains_key(&path!["a"]));
        assert_eq!(parent.size(&path![]), 1);

        assert_eq!(Blob::from_node(Node::null()).root(), None);
        parent.put(&path!["n"], Node::null());
        assert!(!parent.slice(&path!["n"]).contains_key(&path![]));
    }

    #[test]
    fn test_recursive_put() {
        let b1 = Blob::new();
        let b2 = Blob::new();
        let b3 = Blob::new();

        b1.put(&path![], &b2);
        b1.put(&path!["a"], "happy");
        b3.put(&path!["b"], "sad");
        b1.put(&path!["d", "d"], &b3);
        b1.put(&path!["d", "d", "c"], "woot");

        assert_eq!(b1.get(&path!["a"]), Some(Node::from("happy")));
        assert_eq!(b2.get(&path!["a"]), None);
        assert_eq!(b1.get(&path!["d", "d", "b"]), Some(Node::from("sad")));
        assert_eq!(b3.get(&path!["b"]), Some(Node::from("sad")));
        assert_eq!(b1.get(&path!["d", "d", "c"]), Some(Node::from("woot")));
        // the stored value is b3's root mapping, not a reference to b3
        assert_eq!(b1.get(&path!["d", "d"]).unwrap().kind(), NodeKind::Mapping);
        assert_eq!(b3.get(&path!["c"]), Some(Node::from("woot")));
    }

    #[test]
    fn test_recursive_add() {
        let b1 = Blob::new();
        let b2 = Blob::new();
        let b3 = Blob::new();

        b1.add(&path![], &b2).unwrap();
        b1.add(&path![0], &b3).unwrap();
        b1.add(&path![0, 0, "a"], "happy").unwrap();
        b1.add(&path![], "sad").unwrap();
        b1.add(&path![0], "woot").unwrap();

        assert_eq!(b1.get(&path![0, 0, "a", 0]), Some(Node::from("happy")));
        assert_eq!(b1.get(&path![1]), Some(Node::from("sad")));
        assert_eq!(b1.get(&path![0, 1]), Some(Node::from("woot")));

        b1.put(&path!["closet"], "door");

        assert_eq!(b1.get(&path![0, 0, "a", 0]), Some(Node::from("happy")));
        assert_eq!(b1.get(&path![1]), Some(Node::from("sad")));
        assert_eq!(b1.get(&path![0, 1]), Some(Node::from("woot")));
        assert_eq!(b1.get(&path!["closet"]), Some(Node::from("door")));
    }

    #[test]
    fn test_slice_propagation() {
        let b1 = Blob::new();
        let b2 = b1.slice(&path!["s", "t"]);

        b2.put(&path!["x"], 4);

        assert_eq!(b1.get(&path!["s", "t", "x"]), Some(Node::from(4)));
        assert_eq!(b1.size(&path!["s"]), 1);

        b2.clear();

        assert!(b1.get(&path!["s"]).is_some());
        assert_eq!(b1.size(&path!["s"]), 0);
        assert_eq!(b1.get(&path!["s", "t"]), None);
    }

    #[test]
    fn test_slice_root_put_propagates() {
        let root = Blob::new();
        let slice = root.slice(&path!["cfg"]);
        assert_eq!(slice.put(&path![], "flat"), None);
        assert_eq!(root.get(&path!["cfg"]), Some(Node::from("flat")));
    }

    #[test]
    fn test_slice_of_slice() {
        let root = Blob::new();
        let mid = root.slice(&path!["a"]);
        let leaf = mid.slice(&path!["b", 1]);
        leaf.put(&path!["c"], true);

        assert_eq!(root.get(&path!["a", "b", 1, "c"]), Some(Node::from(true)));
        assert_eq!(root.size(&path!["a", "b"]), 2);
        assert_eq!(leaf.position(), &path!["b", 1]);
        assert!(leaf.parent().unwrap().ptr_eq(&mid));
        assert_eq!(leaf.format_keys(true, &path!["c"]), "a:b:1:c");
        assert_eq!(leaf.format_keys(false, &path!["c"]), "c");
    }

    #[test]
    fn test_slice_aliases_existing_data() {
        let root = Blob::new();
        root.put(&path!["a", "b"], 1);
        let slice = root.slice(&path!["a"]);
        root.put(&path!["a", "c"], 2);
        assert_eq!(slice.get(&path!["c"]), Some(Node::from(2)));
        slice.remove(&path!["b"]);
        assert_eq!(root.get(&path!["a", "b"]), None);
    }

    #[test]
    fn test_slice_coercion_propagates() {
        let root = Blob::new();
        root.put(&path!["list", 0], "x");
        let slice = root.slice(&path!["list"]);
        slice.put(&path!["name"], "converted");
        let list = root.get(&path!["list"]).unwrap();
        assert_eq!(list.kind(), NodeKind::Mapping);
        assert_eq!(root.get(&path!["list", 0]), Some(Node::from("x")));
        assert_eq!(root.get(&path!["list", "name"]), Some(Node::from("converted")));
    }

    #[test]
    fn test_format_keys_null() {
        let b = Blob::new();
        assert_eq!(b.format_keys(true, &[Key::Null, Key::from("x")]), "<null>:x");
    }
}
