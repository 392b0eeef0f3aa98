//! core::topology
//!
//! Derived parent/child/sibling structure over a flat node collection.
//!
//! # Architecture
//!
//! No parent pointers are ever persisted. The [`Topology`] index is rebuilt
//! from the node collection at the start of each operation that needs it:
//! every id is grouped under its structural parent (roots under the `None`
//! key), and each group is sorted in id order. An id whose parent id has no
//! corresponding node still groups under that parent, which is how orphaned
//! chains in malformed input stay observable.
//!
//! # Invariants
//!
//! - Never mutates the supplied collection
//! - Deterministic: same nodes, same index

use std::collections::BTreeMap;

use super::graph::{Choice, Node};
use super::id::NodeId;

/// Parent-to-ordered-children index over a node collection.
#[derive(Debug, Default)]
pub struct Topology {
    /// Children of each parent id, sorted; roots live under `None`.
    children: BTreeMap<Option<NodeId>, Vec<NodeId>>,
}

impl Topology {
    /// Build the index from a node collection.
    pub fn build(nodes: &[Node]) -> Self {
        let mut children: BTreeMap<Option<NodeId>, Vec<NodeId>> = BTreeMap::new();
        for node in nodes {
            children
                .entry(node.id.parent())
                .or_default()
                .push(node.id.clone());
        }
        for group in children.values_mut() {
            group.sort();
        }
        Self { children }
    }

    /// Root-level ids, in id order.
    pub fn roots(&self) -> &[NodeId] {
        self.group(&None)
    }

    /// Direct children of `id`, in id order.
    pub fn children_of(&self, id: &NodeId) -> &[NodeId] {
        self.group(&Some(id.clone()))
    }

    /// All ids at `id`'s level, including `id` itself: the roots if `id` is
    /// a root, otherwise its parent's children.
    pub fn siblings_of(&self, id: &NodeId) -> &[NodeId] {
        self.group(&id.parent())
    }

    /// The id after `id` among its siblings, or `None` at the end.
    pub fn next_sibling(&self, id: &NodeId) -> Option<&NodeId> {
        let siblings = self.siblings_of(id);
        let at = siblings.iter().position(|s| s == id)?;
        siblings.get(at + 1)
    }

    /// The id before `id` among its siblings, or `None` at the start.
    pub fn prev_sibling(&self, id: &NodeId) -> Option<&NodeId> {
        let siblings = self.siblings_of(id);
        let at = siblings.iter().position(|s| s == id)?;
        at.checked_sub(1).and_then(|i| siblings.get(i))
    }

    /// Consume the index, yielding the raw parent-to-children groups.
    ///
    /// The migration engine edits these groups before renumbering.
    pub(crate) fn into_groups(self) -> BTreeMap<Option<NodeId>, Vec<NodeId>> {
        self.children
    }

    fn group(&self, key: &Option<NodeId>) -> &[NodeId] {
        self.children.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Every `(node, choice)` pair anywhere in the collection whose choice
/// targets `id`.
pub fn incoming_references<'a>(id: &NodeId, nodes: &'a [Node]) -> Vec<(&'a Node, &'a Choice)> {
    let mut references = Vec::new();
    for node in nodes {
        for choice in &node.choices {
            if &choice.to == id {
                references.push((node, choice));
            }
        }
    }
    references
}

/// Whether any choice in the collection targets `id`.
pub fn is_referenced(id: &NodeId, nodes: &[Node]) -> bool {
    nodes
        .iter()
        .any(|node| node.choices.iter().any(|choice| &choice.to == id))
}
