//! core::graph
//!
//! Decision-graph data model.
//!
//! # Architecture
//!
//! A graph is a title plus a flat collection of nodes. Hierarchy is never
//! stored as pointers; it is encoded entirely in each node's [`NodeId`] and
//! recomputed on demand (see [`crate::core::topology`]). Choices are loose
//! references by id: a choice may point at a node that does not exist
//! (a *dangling* reference), which is a detectable state rather than an
//! error.
//!
//! # Invariants
//!
//! - Node ids are unique across the collection
//! - At every level, sibling slot numbers form the contiguous range 1..N
//!   (restored by [`crate::engine::migrate`] after structural edits)

use serde::{Deserialize, Serialize};

use super::id::NodeId;

/// A labeled edge from one node to another, by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown for this choice.
    pub label: String,
    /// Target node id. May be dangling.
    pub to: NodeId,
}

impl Choice {
    /// Create a choice with the given label and target.
    pub fn new(label: impl Into<String>, to: NodeId) -> Self {
        Self {
            label: label.into(),
            to,
        }
    }
}

/// A single decision node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    pub body: String,
    pub choices: Vec<Choice>,
}

impl Node {
    /// Create a node with no choices.
    pub fn new(id: NodeId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            choices: Vec::new(),
        }
    }
}

/// A decision graph: a title and a flat node collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub title: String,
    pub nodes: Vec<Node>,
}

impl Graph {
    /// Create an empty graph with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: Vec::new(),
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Look up a node by id, mutably.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The default starter graph: a small troubleshooting flow.
    pub fn seed() -> Self {
        fn id(text: &str) -> NodeId {
            NodeId::new(text).expect("seed ids are well-formed")
        }
        let mut nodes = vec![
            Node::new(
                id("1"),
                "My application is not working",
                "Starting point for debugging.",
            ),
            Node::new(id("2"), "Check healthcheck", "Call /health."),
            Node::new(
                id("3"),
                "Check database availability",
                "Log into DB; check connection.",
            ),
            Node::new(
                id("4"),
                "Fix negative healthcheck",
                "Collect logs, check dependencies.",
            ),
            Node::new(
                id("5"),
                "Fix non-working healthcheck",
                "Network/Ingress/Firewall; after fixing return to the problem.",
            ),
        ];
        nodes[0].choices.push(Choice::new("Check healthcheck", id("2")));
        nodes[1].choices.push(Choice::new("positive", id("3")));
        nodes[1].choices.push(Choice::new("negative", id("4")));
        nodes[1].choices.push(Choice::new("no response", id("5")));
        nodes[4].choices.push(Choice::new("return to start", id("1")));
        Self {
            title: "Diagnosis: Application Not Working".to_string(),
            nodes,
        }
    }
}
