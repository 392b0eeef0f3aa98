//! core::verify
//!
//! Graph validation.
//!
//! # Checks
//!
//! - Duplicate node ids
//! - Empty titles, bodies, and choice labels
//! - Dangling choices (target id resolves to no node)
//! - Nodes whose parent id resolves to no node (orphaned chains)
//! - Per-level slot contiguity: at the root level and under every parent,
//!   sibling slot numbers must be exactly 1..N
//!
//! # Invariants
//!
//! - Never mutates the graph
//! - Deterministic: issues are reported in a stable order

use std::collections::BTreeMap;

use thiserror::Error;

use super::graph::Graph;
use super::id::NodeId;
use super::topology::Topology;

/// A single validation finding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphIssue {
    #[error("duplicate id: {0}")]
    DuplicateId(NodeId),

    #[error("empty title in #{0}")]
    EmptyTitle(NodeId),

    #[error("empty body in #{0}")]
    EmptyBody(NodeId),

    #[error("empty choice label in #{0}")]
    EmptyLabel(NodeId),

    #[error("missing target {target} from #{node}")]
    DanglingChoice { node: NodeId, target: NodeId },

    #[error("node {id} has no parent node {missing_parent}")]
    MissingParent { id: NodeId, missing_parent: NodeId },

    #[error("root slots are not contiguous: {slots:?}")]
    NonContiguousRoots { slots: Vec<u32> },

    #[error("child slots under {parent} are not contiguous: {slots:?}")]
    NonContiguousChildren { parent: NodeId, slots: Vec<u32> },
}

/// Result of validating a graph.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether validation passed with no issues.
    pub ok: bool,
    /// Issues found, in a stable order.
    pub issues: Vec<GraphIssue>,
}

/// Validate a graph's referential and structural integrity.
pub fn verify_graph(graph: &Graph) -> VerifyResult {
    let mut issues = Vec::new();

    // Duplicate ids, counted once per offending id.
    let mut seen: BTreeMap<&NodeId, usize> = BTreeMap::new();
    for node in &graph.nodes {
        *seen.entry(&node.id).or_default() += 1;
    }
    for (id, count) in &seen {
        if *count > 1 {
            issues.push(GraphIssue::DuplicateId((*id).clone()));
        }
    }

    // Per-node content and reference checks.
    for node in &graph.nodes {
        if node.title.trim().is_empty() {
            issues.push(GraphIssue::EmptyTitle(node.id.clone()));
        }
        if node.body.trim().is_empty() {
            issues.push(GraphIssue::EmptyBody(node.id.clone()));
        }
        for choice in &node.choices {
            if choice.label.trim().is_empty() {
                issues.push(GraphIssue::EmptyLabel(node.id.clone()));
            }
            if !seen.contains_key(&choice.to) {
                issues.push(GraphIssue::DanglingChoice {
                    node: node.id.clone(),
                    target: choice.to.clone(),
                });
            }
        }
    }

    // Structural checks over the derived topology.
    let topology = Topology::build(&graph.nodes);
    let root_slots: Vec<u32> = topology.roots().iter().map(NodeId::first_segment).collect();
    if !is_contiguous(&root_slots) {
        issues.push(GraphIssue::NonContiguousRoots { slots: root_slots });
    }
    for node in &graph.nodes {
        if let Some(parent) = node.id.parent() {
            if !seen.contains_key(&parent) {
                issues.push(GraphIssue::MissingParent {
                    id: node.id.clone(),
                    missing_parent: parent,
                });
            }
        }
        let child_slots: Vec<u32> = topology
            .children_of(&node.id)
            .iter()
            .map(NodeId::last_segment)
            .collect();
        if !is_contiguous(&child_slots) {
            issues.push(GraphIssue::NonContiguousChildren {
                parent: node.id.clone(),
                slots: child_slots,
            });
        }
    }

    VerifyResult {
        ok: issues.is_empty(),
        issues,
    }
}

/// Whether sorted slot values are exactly 1..=len.
fn is_contiguous(slots: &[u32]) -> bool {
    slots
        .iter()
        .enumerate()
        .all(|(i, slot)| *slot as usize == i + 1)
}
