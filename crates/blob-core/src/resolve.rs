use crate::key::Key;
use crate::node::Node;

/// Walks `path` from `root` through existing nodes.
///
/// Never creates or mutates anything. Missing keys, out-of-range or
/// non-index keys on sequences, any key on a set or scalar, and absent
/// intermediates all yield `None`. Nested blobs are unwrapped without
/// consuming a path step, including at the end of the walk.
pub fn resolve(root: Option<Node>, path: &[Key]) -> Option<Node> {
    let mut current = root?.deblob()?;
    for key in path {
        let next = match &current {
            Node::Mapping(map) => map.borrow().get(key).cloned(),
            Node::Sequence(seq) => {
                let idx = key.as_index()?;
                seq.borrow().get(idx).cloned()
            }
            Node::Set(_) | Node::Scalar(_) => None,
            Node::Blob(_) => unreachable!("resolve walked into an unwrapped blob"),
        };
        current = next?.deblob()?;
    }
    Some(current)
}
