//! core::alloc
//!
//! Next-free-slot id allocation.
//!
//! Used by the editor layer when creating root nodes and child nodes. Both
//! functions observe the collection through a fresh [`Topology`] index and
//! never mutate anything; gaps left by earlier removals are not reused
//! (the migration engine is what restores contiguity).

use super::graph::Node;
use super::id::NodeId;
use super::topology::Topology;

/// The next free root id: "1" for an empty root level, otherwise the
/// maximum root slot plus one.
pub fn next_root_id(nodes: &[Node]) -> NodeId {
    let topology = Topology::build(nodes);
    match topology.roots().last() {
        None => NodeId::root(1),
        Some(max) => NodeId::root(max.first_segment() + 1),
    }
}

/// The next free child id under `parent`: `parent.1` if `parent` has no
/// children, otherwise the maximum child slot plus one.
pub fn next_child_id(parent: &NodeId, nodes: &[Node]) -> NodeId {
    let topology = Topology::build(nodes);
    match topology.children_of(parent).last() {
        None => parent.child(1),
        Some(max) => parent.child(max.last_segment() + 1),
    }
}
