//! Path materialization: walk a key path, creating or converting containers
//! so that the final container can take the terminal key.

use crate::blob::Blob;
use crate::coerce::{fits, make_container, Step};
use crate::key::Key;
use crate::node::Node;

/// Where a terminal write lands.
#[derive(Debug)]
pub(crate) enum Target {
    /// The path was empty: assign to the blob's root directly.
    Root,
    /// The container that directly holds (or appends) the terminal key.
    Container(Node),
}

/// Materializes `path` inside `blob`.
///
/// Every key is checked against the container that will hold it, so the
/// returned container already fits the last key of `path`. With
/// `reserve_terminal` one implicit append slot follows `path`, and the
/// returned container is the one at `path` itself.
pub(crate) fn make_path(blob: &Blob, path: &[Key], reserve_terminal: bool) -> Target {
    let steps: Vec<Step<'_>> = path
        .iter()
        .map(Step::Key)
        .chain(reserve_terminal.then_some(Step::Append))
        .collect();
    let Some(&first) = steps.first() else {
        return Target::Root;
    };

    let mut node = fit_root(blob, first);
    for (key, &next) in path.iter().zip(steps.iter().skip(1)) {
        node = descend(&node, key, next);
    }
    Target::Container(node)
}

/// Makes the blob's own root accept `step`, replacing it if needed.
fn fit_root(blob: &Blob, step: Step<'_>) -> Node {
    match blob.root() {
        Some(root) if fits(step, Some(&root)) => root,
        previous => {
            let fresh = make_container(step, previous.as_ref());
            blob.set_root(Some(fresh.clone()));
            fresh
        }
    }
}

/// Moves from `parent` to its child at `key`, making the child accept `next`.
fn descend(parent: &Node, key: &Key, next: Step<'_>) -> Node {
    match parent {
        Node::Mapping(map) => {
            let existing = map.borrow().get(key).cloned();
            match existing {
                Some(Node::Blob(inner)) => fit_root(&inner, next),
                Some(child) if fits(next, Some(&child)) => child,
                previous => {
                    let fresh = make_container(next, previous.as_ref());
                    map.borrow_mut().insert(key.clone(), fresh.clone());
                    fresh
                }
            }
        }
        Node::Sequence(seq) => {
            let Some(idx) = key.as_index() else {
                unreachable!("sequence was fitted to non-index key {key}");
            };
            let existing = seq.borrow().get(idx).cloned();
            match existing {
                Some(Node::Blob(inner)) => fit_root(&inner, next),
                Some(child) if fits(next, Some(&child)) => child,
                Some(previous) => {
                    let fresh = make_container(next, Some(&previous));
                    seq.borrow_mut()[idx] = fresh.clone();
                    fresh
                }
                None => {
                    let fresh = make_container(next, None);
                    let mut items = seq.borrow_mut();
                    items.resize(idx, Node::null());
                    items.push(fresh.clone());
                    fresh
                }
            }
        }
        Node::Set(_) | Node::Scalar(_) | Node::Blob(_) => {
            unreachable!("materializer cannot descend through a {}", parent.kind())
        }
    }
}
