//! Property-based tests for ids and migration.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::cmp::Ordering;
use std::collections::HashMap;

use proptest::prelude::*;

use branchpoint::core::alloc::{next_child_id, next_root_id};
use branchpoint::core::graph::{Choice, Graph, Node};
use branchpoint::core::id::NodeId;
use branchpoint::core::verify::verify_graph;
use branchpoint::engine::migrate::{migrate, MigrateError};

/// Strategy for valid id segment sequences.
fn arb_segments() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=40, 1..6)
}

fn id_from(segments: &[u32]) -> NodeId {
    let text = segments
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".");
    NodeId::new(text).expect("generated segments are positive")
}

/// Strategy for a well-formed node collection, grown through the allocator
/// so every level is contiguous. Titles are unique, which lets assertions
/// track a node across relabelings.
fn arb_tree() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 1..24).prop_map(
        |parent_picks| {
            let mut nodes: Vec<Node> = Vec::new();
            for (i, pick) in parent_picks.into_iter().enumerate() {
                let id = match pick {
                    Some(index) if !nodes.is_empty() => {
                        let parent = nodes[index.index(nodes.len())].id.clone();
                        next_child_id(&parent, &nodes)
                    }
                    _ => next_root_id(&nodes),
                };
                nodes.push(Node::new(id, format!("n{i}"), "body"));
            }
            nodes
        },
    )
}

/// A tree plus random internal choices between its nodes.
fn arb_graph() -> impl Strategy<Value = Vec<Node>> {
    (
        arb_tree(),
        prop::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..16),
    )
        .prop_map(|(mut nodes, edges)| {
            for (from, to) in edges {
                let target = nodes[to.index(nodes.len())].id.clone();
                let source = from.index(nodes.len());
                let label = format!("c{}", nodes[source].choices.len());
                nodes[source].choices.push(Choice::new(label, target));
            }
            nodes
        })
}

fn as_graph(nodes: &[Node]) -> Graph {
    Graph {
        title: "property".into(),
        nodes: nodes.to_vec(),
    }
}

proptest! {
    /// Any valid id round-trips through serde as its dotted text.
    #[test]
    fn id_serde_roundtrip(segments in arb_segments()) {
        let id = id_from(&segments);
        let json = serde_json::to_string(&id).unwrap();
        let parsed: NodeId = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// `child` and `parent` are inverse.
    #[test]
    fn child_then_parent_is_identity(segments in arb_segments(), slot in 1u32..=40) {
        let id = id_from(&segments);
        prop_assert_eq!(id.child(slot).parent(), Some(id));
    }

    /// Id ordering equals segmentwise comparison with absent segments as 0.
    #[test]
    fn ordering_matches_padded_segment_compare(a in arb_segments(), b in arb_segments()) {
        let expected = {
            let len = a.len().max(b.len());
            let pad = |v: &[u32], i: usize| v.get(i).copied().unwrap_or(0);
            (0..len)
                .map(|i| pad(&a, i).cmp(&pad(&b, i)))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        };
        prop_assert_eq!(id_from(&a).cmp(&id_from(&b)), expected);
    }

    /// Trees grown through the allocator validate cleanly.
    #[test]
    fn allocator_grown_trees_are_contiguous(nodes in arb_tree()) {
        let result = verify_graph(&as_graph(&nodes));
        prop_assert!(result.ok, "issues: {:?}", result.issues);
    }

    /// A move either fully succeeds with all postconditions intact or is
    /// rejected as a cycle, and never loses or corrupts a node.
    #[test]
    fn moves_preserve_count_contiguity_and_references(
        nodes in arb_graph(),
        mover in any::<prop::sample::Index>(),
        dest in prop::option::of(any::<prop::sample::Index>()),
        position in prop::option::of(1usize..12),
    ) {
        let node_id = nodes[mover.index(nodes.len())].id.clone();
        let dest_id = dest.map(|d| nodes[d.index(nodes.len())].id.clone());

        match migrate(&nodes, &node_id, dest_id.as_ref(), position) {
            Ok(moved) => {
                prop_assert_eq!(moved.len(), nodes.len());

                // Relabeled collection is structurally sound.
                let result = verify_graph(&as_graph(&moved));
                prop_assert!(result.ok, "issues: {:?}", result.issues);

                // Every reference still points at the same logical node.
                // Titles are unique, so they identify nodes across ids.
                let old_title: HashMap<&NodeId, &str> = nodes
                    .iter()
                    .map(|n| (&n.id, n.title.as_str()))
                    .collect();
                let new_id: HashMap<&str, &NodeId> = moved
                    .iter()
                    .map(|n| (n.title.as_str(), &n.id))
                    .collect();
                for node in &nodes {
                    let relabeled = new_id[node.title.as_str()];
                    let followed = moved.iter().find(|n| &n.id == relabeled).unwrap();
                    for (choice, new_choice) in node.choices.iter().zip(&followed.choices) {
                        let target_title = old_title[&choice.to];
                        prop_assert_eq!(&new_choice.to, new_id[target_title]);
                    }
                }
            }
            Err(MigrateError::Cycle { .. }) => {
                let dest_id = dest_id.expect("cycle requires a destination");
                prop_assert!(
                    dest_id == node_id || node_id.is_ancestor_of(&dest_id),
                    "spurious cycle: {node_id} -> {dest_id}"
                );
            }
            Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }

    /// The moved node lands exactly where asked at the root level (after
    /// clamping), matching its requested slot number.
    #[test]
    fn root_placement_matches_requested_position(
        nodes in arb_tree(),
        mover in any::<prop::sample::Index>(),
        position in 1usize..12,
    ) {
        let picked = nodes[mover.index(nodes.len())].id.clone();
        let title = nodes
            .iter()
            .find(|n| n.id == picked)
            .unwrap()
            .title
            .clone();

        let moved = migrate(&nodes, &picked, None, Some(position)).unwrap();

        let root_count = moved.iter().filter(|n| n.id.is_root()).count();
        let expected_slot = position.min(root_count) as u32;
        let landed = moved
            .iter()
            .find(|n| n.title == title)
            .expect("moved node survives");
        prop_assert!(landed.id.is_root());
        prop_assert_eq!(landed.id.first_segment(), expected_slot);
    }
}
