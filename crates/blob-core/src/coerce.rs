//! Container coercion policy.
//!
//! Decides whether the container in a slot can take the next key as-is and,
//! when it cannot, builds the replacement container with the old contents
//! migrated into it.

use tracing::debug;

use crate::key::Key;
use crate::node::{Mapping, Node};

/// Largest number of placeholder entries a sequence write may pad before the
/// sequence is converted into a mapping keyed by index.
pub const PAD_LIMIT: usize = 100;

/// One step of a materialization walk.
///
/// `Append` means "the next free slot" for whatever container ends up
/// holding it. It is never a caller-supplied key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step<'k> {
    Key(&'k Key),
    Append,
}

impl Step<'_> {
    fn index(&self) -> Option<usize> {
        match self {
            Step::Key(key) => key.as_index(),
            Step::Append => None,
        }
    }
}

/// True when `node` accepts `step` without being replaced.
pub(crate) fn fits(step: Step<'_>, node: Option<&Node>) -> bool {
    match node {
        None | Some(Node::Scalar(_)) => false,
        Some(Node::Mapping(_)) => true,
        Some(Node::Sequence(seq)) => match step {
            Step::Append => true,
            Step::Key(key) => key
                .as_index()
                .is_some_and(|n| n < seq.borrow().len() + PAD_LIMIT),
        },
        Some(Node::Set(_)) => step == Step::Append,
        // Delegated: the walk coerces the blob's own root instead.
        Some(Node::Blob(_)) => true,
    }
}

/// Builds a fresh container for `step`, migrating `previous` into it.
///
/// Appends and small indices get a sequence; anything else gets a mapping.
/// A non-empty set always becomes a mapping so its members survive.
pub(crate) fn make_container(step: Step<'_>, previous: Option<&Node>) -> Node {
    let keeps_members = matches!(previous, Some(Node::Set(set)) if !set.borrow().is_empty());
    let wants_sequence = matches!(step, Step::Append) || step.index().is_some_and(|n| n < PAD_LIMIT);
    if wants_sequence && !keeps_members {
        log_replacement(previous, "sequence", 0);
        return Node::sequence();
    }

    let mut map = Mapping::new();
    match previous {
        Some(Node::Sequence(seq)) => {
            for (i, item) in seq.borrow().iter().enumerate() {
                map.insert(Key::from(i), item.clone());
            }
        }
        Some(Node::Set(set)) => {
            for member in set.borrow().iter() {
                map.insert(member.clone(), Node::Scalar(member.clone()));
            }
        }
        _ => {}
    }
    log_replacement(previous, "mapping", map.len());
    Node::from(map)
}

fn log_replacement(previous: Option<&Node>, to: &str, migrated: usize) {
    if let Some(prev) = previous {
        debug!(
            target: "blob::coerce",
            from = prev.kind().as_str(),
            to,
            migrated,
            "replacing container"
        );
    }
}
