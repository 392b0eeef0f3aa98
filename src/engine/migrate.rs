//! engine::migrate
//!
//! Atomic subtree moves with full relabeling.
//!
//! # Architecture
//!
//! A move is never an in-place patch. The engine rebuilds the
//! parent-to-children index for the whole collection, splices the moved id
//! out of its old sibling list and into the destination list, then
//! renumbers the *entire* tree depth-first from the root level. The global
//! renumber is required, not optional: inserting at a sibling position
//! shifts every later sibling's slot, and the moved subtree's descendants
//! must all be re-prefixed under the new id. Every old-to-new id pair is
//! recorded, and every choice anywhere in the graph is rewritten through
//! that mapping, so references follow the nodes they pointed at.
//!
//! # Invariants
//!
//! - Pure: the input collection is never mutated
//! - All-or-nothing: a complete relabeled collection, or an error and no
//!   output
//! - Node count is preserved exactly
//! - After success, every level's sibling slots are exactly 1..N
//! - Ids never reached by the root walk (orphaned parent chains in
//!   malformed input) are appended as extra roots, in ascending id order,
//!   each keeping its own subtree; no node is ever dropped
//!
//! # Example
//!
//! ```
//! use branchpoint::core::graph::Graph;
//! use branchpoint::core::id::NodeId;
//! use branchpoint::engine::migrate::migrate;
//!
//! let graph = Graph::seed();
//! let node = NodeId::new("5").unwrap();
//! let dest = NodeId::new("2").unwrap();
//!
//! // "5" becomes "2"'s only child, and the old "2" onward close ranks.
//! let moved = migrate(&graph.nodes, &node, Some(&dest), None).unwrap();
//! assert_eq!(moved.len(), graph.nodes.len());
//! assert!(moved.iter().any(|n| n.id == NodeId::new("2.1").unwrap()));
//! ```

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::core::graph::{Choice, Node};
use crate::core::id::NodeId;
use crate::core::topology::Topology;

/// Errors from a rejected or failed move.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigrateError {
    /// The moved node or the destination parent does not exist.
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// The destination is the moved node itself or one of its descendants.
    #[error("cannot move {node} under {dest}: destination is inside the moved subtree")]
    Cycle { node: NodeId, dest: NodeId },

    /// The desired sibling position is not a positive integer.
    #[error("invalid position {0}: positions are numbered from 1")]
    InvalidPosition(usize),

    /// The relabeling walk failed to assign an id. Engine defect, not a
    /// user error; callers should treat this as fatal.
    #[error("relabeling produced no id for {0}")]
    Integrity(NodeId),
}

/// Move `node_id` (with its entire subtree) under `new_parent`, or to the
/// root level when `new_parent` is `None`, at an optional 1-based sibling
/// `position` (clamped; append when omitted).
///
/// Returns the fully relabeled, reference-consistent collection sorted by
/// new id. The input is untouched regardless of outcome.
///
/// # Errors
///
/// [`MigrateError::NotFound`], [`MigrateError::Cycle`], and
/// [`MigrateError::InvalidPosition`] are detected before any structural
/// work; [`MigrateError::Integrity`] signals an engine defect.
pub fn migrate(
    nodes: &[Node],
    node_id: &NodeId,
    new_parent: Option<&NodeId>,
    position: Option<usize>,
) -> Result<Vec<Node>, MigrateError> {
    if !nodes.iter().any(|n| &n.id == node_id) {
        return Err(MigrateError::NotFound(node_id.clone()));
    }
    if let Some(dest) = new_parent {
        if !nodes.iter().any(|n| &n.id == dest) {
            return Err(MigrateError::NotFound(dest.clone()));
        }
        if dest == node_id || node_id.is_ancestor_of(dest) {
            return Err(MigrateError::Cycle {
                node: node_id.clone(),
                dest: dest.clone(),
            });
        }
    }
    if position == Some(0) {
        return Err(MigrateError::InvalidPosition(0));
    }

    // Parent-to-ordered-children index over every id in the collection.
    let mut groups = Topology::build(nodes).into_groups();

    // Splice the moved id out of its old sibling list. Its own children
    // stay grouped under it and travel with it.
    if let Some(siblings) = groups.get_mut(&node_id.parent()) {
        siblings.retain(|id| id != node_id);
    }

    // Splice it into the destination list at the clamped position.
    let destination = groups.entry(new_parent.cloned()).or_default();
    let at = position
        .map(|p| p - 1)
        .unwrap_or(destination.len())
        .min(destination.len());
    destination.insert(at, node_id.clone());

    // Renumber the whole tree depth-first from the root level.
    let mut mapping: HashMap<NodeId, NodeId> = HashMap::with_capacity(nodes.len());
    let roots = groups.get(&None).cloned().unwrap_or_default();
    for (slot, root) in roots.iter().enumerate() {
        renumber_subtree(&groups, root, NodeId::root(slot as u32 + 1), &mut mapping);
    }

    // Ids the walk never reached hang from a parent chain with no root.
    // Append them as extra roots, ascending, each with its own subtree.
    let mut next_root = roots.len() as u32 + 1;
    let mut orphans: Vec<&NodeId> = nodes
        .iter()
        .map(|n| &n.id)
        .filter(|id| !mapping.contains_key(*id))
        .collect();
    orphans.sort();
    for orphan in orphans {
        if mapping.contains_key(orphan) {
            continue; // already carried in by an earlier orphan's subtree
        }
        renumber_subtree(&groups, orphan, NodeId::root(next_root), &mut mapping);
        next_root += 1;
    }

    // Rebuild every node under its new id, following references through
    // the mapping. Targets outside the known node set stay as they are:
    // dangling references are a pre-existing condition, not ours to fix.
    let mut result = Vec::with_capacity(nodes.len());
    for node in nodes {
        let new_id = mapping
            .get(&node.id)
            .ok_or_else(|| MigrateError::Integrity(node.id.clone()))?
            .clone();
        let choices = node
            .choices
            .iter()
            .map(|choice| Choice {
                label: choice.label.clone(),
                to: mapping
                    .get(&choice.to)
                    .cloned()
                    .unwrap_or_else(|| choice.to.clone()),
            })
            .collect();
        result.push(Node {
            id: new_id,
            title: node.title.clone(),
            body: node.body.clone(),
            choices,
        });
    }
    result.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(result)
}

/// Assign `new` to `old` and recurse into `old`'s children in order,
/// numbering their slots from 1.
fn renumber_subtree(
    groups: &BTreeMap<Option<NodeId>, Vec<NodeId>>,
    old: &NodeId,
    new: NodeId,
    mapping: &mut HashMap<NodeId, NodeId>,
) {
    if let Some(children) = groups.get(&Some(old.clone())) {
        for (slot, child) in children.iter().enumerate() {
            renumber_subtree(groups, child, new.child(slot as u32 + 1), mapping);
        }
    }
    mapping.insert(old.clone(), new);
}
