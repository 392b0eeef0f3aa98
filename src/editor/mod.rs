//! editor
//!
//! Controller layer: applies user-driven edits to the graph and keeps the
//! persisted copy in step.
//!
//! # Architecture
//!
//! The [`Editor`] owns the current [`Graph`] and a [`GraphStore`]. Every
//! mutation is computed first, persisted second, and only then committed to
//! memory, so the in-memory graph always matches the stored document and a
//! failed operation leaves both exactly as they were. The editor contains
//! no structural logic of its own: ids come from [`crate::core::alloc`] and
//! moves go through [`crate::engine::migrate`].
//!
//! # Invariants
//!
//! - In-memory and persisted graphs are identical between operations
//! - A failed operation changes nothing, in memory or on disk

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::core::alloc::{next_child_id, next_root_id};
use crate::core::graph::{Choice, Graph, Node};
use crate::core::id::NodeId;
use crate::core::verify::{verify_graph, VerifyResult};
use crate::engine::migrate::migrate;
use crate::store::GraphStore;

/// Default title and body for freshly created nodes.
const NEW_NODE_TITLE: &str = "New Node";
const NEW_CHILD_TITLE: &str = "New Child Node";
const NEW_NODE_BODY: &str = "Description…";

/// Stateful editing session over a persisted graph.
#[derive(Debug)]
pub struct Editor<S: GraphStore> {
    store: S,
    key: String,
    graph: Graph,
}

impl<S: GraphStore> Editor<S> {
    /// Open the graph stored under `key`, or start from the seed graph if
    /// nothing is stored yet.
    pub fn open(store: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let graph = store
            .load(&key)
            .with_context(|| format!("loading graph under key {key:?}"))?
            .unwrap_or_else(Graph::seed);
        Ok(Self { store, key, graph })
    }

    /// The current graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Create a new root-level node.
    pub fn create_node(&mut self) -> Result<NodeId> {
        let id = next_root_id(&self.graph.nodes);
        let mut graph = self.graph.clone();
        graph
            .nodes
            .push(Node::new(id.clone(), NEW_NODE_TITLE, NEW_NODE_BODY));
        self.commit(graph)?;
        info!(node = %id, "created node");
        Ok(id)
    }

    /// Create a child under `parent`; the parent also gains a choice
    /// pointing at the new child (label left for the user to fill in).
    pub fn add_child(&mut self, parent: &NodeId) -> Result<NodeId> {
        if !self.graph.contains(parent) {
            bail!("no node {parent} to add a child under");
        }
        let id = next_child_id(parent, &self.graph.nodes);
        let mut graph = self.graph.clone();
        graph
            .nodes
            .push(Node::new(id.clone(), NEW_CHILD_TITLE, NEW_NODE_BODY));
        if let Some(parent_node) = graph.node_mut(parent) {
            parent_node.choices.push(Choice::new("", id.clone()));
        }
        self.commit(graph)?;
        info!(node = %id, parent = %parent, "created child node");
        Ok(id)
    }

    /// Copy a node (title, body, choices) under a fresh root id.
    pub fn clone_node(&mut self, id: &NodeId) -> Result<NodeId> {
        let Some(original) = self.graph.node(id) else {
            bail!("no node {id} to clone");
        };
        let mut copy = original.clone();
        copy.id = next_root_id(&self.graph.nodes);
        let copy_id = copy.id.clone();
        let mut graph = self.graph.clone();
        graph.nodes.push(copy);
        self.commit(graph)?;
        info!(node = %id, copy = %copy_id, "cloned node");
        Ok(copy_id)
    }

    /// Overwrite a node's title and body.
    pub fn update_node(
        &mut self,
        id: &NodeId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<()> {
        let mut graph = self.graph.clone();
        let Some(node) = graph.node_mut(id) else {
            bail!("no node {id} to update");
        };
        node.title = title.into();
        node.body = body.into();
        self.commit(graph)?;
        debug!(node = %id, "updated node");
        Ok(())
    }

    /// Append a choice to a node. The target may be dangling.
    pub fn add_choice(&mut self, id: &NodeId, label: impl Into<String>, to: NodeId) -> Result<()> {
        let mut graph = self.graph.clone();
        let Some(node) = graph.node_mut(id) else {
            bail!("no node {id} to add a choice to");
        };
        node.choices.push(Choice::new(label, to));
        self.commit(graph)?;
        debug!(node = %id, "added choice");
        Ok(())
    }

    /// Delete a node and its whole subtree, removing every choice anywhere
    /// in the graph that pointed into the deleted subtree.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<()> {
        if !self.graph.contains(id) {
            bail!("no node {id} to delete");
        }
        let mut graph = self.graph.clone();
        let doomed = |candidate: &NodeId| candidate == id || id.is_ancestor_of(candidate);
        for node in &mut graph.nodes {
            node.choices.retain(|choice| !doomed(&choice.to));
        }
        graph.nodes.retain(|node| !doomed(&node.id));
        let removed = self.graph.nodes.len() - graph.nodes.len();
        self.commit(graph)?;
        info!(node = %id, removed, "deleted subtree");
        Ok(())
    }

    /// Move a node (and its subtree) under `new_parent`, or to root level,
    /// at an optional 1-based sibling position.
    ///
    /// On failure nothing changes, in memory or in the store; the error
    /// carries the engine's typed rejection.
    pub fn move_node(
        &mut self,
        id: &NodeId,
        new_parent: Option<&NodeId>,
        position: Option<usize>,
    ) -> Result<()> {
        debug!(node = %id, dest = ?new_parent, ?position, "move requested");
        let nodes = migrate(&self.graph.nodes, id, new_parent, position)
            .with_context(|| format!("moving node {id}"))?;
        let graph = Graph {
            title: self.graph.title.clone(),
            nodes,
        };
        self.commit(graph)?;
        info!(node = %id, "moved node");
        Ok(())
    }

    /// Validate the current graph.
    pub fn validate(&self) -> VerifyResult {
        verify_graph(&self.graph)
    }

    /// Persist `graph`, then make it current. The in-memory graph is only
    /// replaced once the store has accepted the new document.
    fn commit(&mut self, graph: Graph) -> Result<()> {
        self.store
            .save(&self.key, &graph)
            .with_context(|| format!("persisting graph under key {:?}", self.key))?;
        self.graph = graph;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::migrate::MigrateError;
    use crate::store::{MemoryStore, DEFAULT_STORE_KEY};

    fn id(text: &str) -> NodeId {
        NodeId::new(text).unwrap()
    }

    fn editor() -> Editor<MemoryStore> {
        Editor::open(MemoryStore::new(), DEFAULT_STORE_KEY).unwrap()
    }

    #[test]
    fn open_falls_back_to_seed() {
        let editor = editor();
        assert_eq!(editor.graph().nodes.len(), Graph::seed().nodes.len());
    }

    #[test]
    fn open_prefers_stored_graph() {
        let store = MemoryStore::new();
        let mut graph = Graph::new("mine");
        graph.nodes.push(Node::new(id("1"), "only", "node"));
        store.save(DEFAULT_STORE_KEY, &graph).unwrap();

        let editor = Editor::open(store, DEFAULT_STORE_KEY).unwrap();
        assert_eq!(editor.graph().title, "mine");
        assert_eq!(editor.graph().nodes.len(), 1);
    }

    #[test]
    fn create_node_allocates_next_root() {
        let mut editor = editor();
        let created = editor.create_node().unwrap();
        assert_eq!(created, id("6"));
        assert_eq!(editor.graph().node(&created).unwrap().title, NEW_NODE_TITLE);
    }

    #[test]
    fn add_child_links_parent_to_child() {
        let mut editor = editor();
        let child = editor.add_child(&id("3")).unwrap();
        assert_eq!(child, id("3.1"));
        let parent = editor.graph().node(&id("3")).unwrap();
        assert_eq!(parent.choices.last().unwrap().to, child);
    }

    #[test]
    fn clone_node_copies_under_fresh_root() {
        let mut editor = editor();
        let copy = editor.clone_node(&id("2")).unwrap();
        assert_eq!(copy, id("6"));
        let copied = editor.graph().node(&copy).unwrap();
        assert_eq!(copied.title, "Check healthcheck");
        assert_eq!(copied.choices.len(), 3);
    }

    #[test]
    fn delete_node_removes_subtree_and_inbound_references() {
        let mut editor = editor();
        let child = editor.add_child(&id("2")).unwrap();
        editor.add_choice(&id("4"), "into subtree", child.clone()).unwrap();

        editor.delete_node(&id("2")).unwrap();
        assert!(!editor.graph().contains(&id("2")));
        assert!(!editor.graph().contains(&child));
        // Both the choice to "2" and the choice into its subtree are gone.
        assert!(editor.graph().node(&id("1")).unwrap().choices.is_empty());
        assert!(editor.graph().node(&id("4")).unwrap().choices.is_empty());
    }

    #[test]
    fn move_node_relabels_and_persists() {
        let store = MemoryStore::new();
        let mut editor = Editor::open(store, DEFAULT_STORE_KEY).unwrap();
        editor.move_node(&id("5"), Some(&id("2")), None).unwrap();

        assert!(editor.graph().contains(&id("2.1")));
        assert!(!editor.graph().contains(&id("5")));
        let result = editor.validate();
        assert!(result.ok, "issues after move: {:?}", result.issues);
    }

    #[test]
    fn failed_move_changes_nothing() {
        let mut editor = editor();
        editor.move_node(&id("5"), Some(&id("2")), None).unwrap();
        let before = editor.graph().clone();

        let err = editor
            .move_node(&id("2"), Some(&id("2.1")), None)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<MigrateError>(),
            Some(&MigrateError::Cycle {
                node: id("2"),
                dest: id("2.1"),
            })
        );
        assert_eq!(editor.graph(), &before);
    }

    #[test]
    fn update_and_add_choice_persist() {
        let store = MemoryStore::new();
        let mut editor = Editor::open(store, DEFAULT_STORE_KEY).unwrap();
        editor.update_node(&id("3"), "DB check", "details").unwrap();
        editor.add_choice(&id("3"), "restart", id("1")).unwrap();

        let reopened = Editor::open(editor.store, DEFAULT_STORE_KEY).unwrap();
        let node = reopened.graph().node(&id("3")).unwrap();
        assert_eq!(node.title, "DB check");
        assert_eq!(node.choices[0].label, "restart");
    }
}
