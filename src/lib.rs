//! Branchpoint - the hierarchy core of an interactive decision-graph editor
//!
//! A decision graph is a flat collection of nodes connected by labeled
//! choices. Nodes are addressed by hierarchical dot-separated ids ("1",
//! "1.2", "1.2.3") that simultaneously encode the tree structure and serve
//! as the stable references choices point at. The hard problem this crate
//! solves is reorganizing that hierarchy: moving a node and its entire
//! subtree to a new parent or to root level, at an optional sibling
//! position, while keeping ids contiguous at every level, rewriting every
//! reference to a relabeled node, and rejecting moves that would graft a
//! subtree into itself - atomically, with no partial mutation on failure.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture; data flows upward
//! only:
//!
//! - [`core`] - Validated ids, the data model, the derived topology index,
//!   slot allocation, and graph validation
//! - [`engine`] - The migration engine: validate, splice, renumber, rewrite
//! - [`store`] - Key-value persistence of the graph document
//! - [`editor`] - Controller layer driving edits and keeping the persisted
//!   copy in step
//!
//! # Correctness Invariants
//!
//! 1. Hierarchy is derived from ids; no parent pointers are ever stored
//! 2. A move either yields a complete, reference-consistent relabeled
//!    collection or a typed error and no output
//! 3. After any successful move, every level's sibling slots are exactly
//!    1..N
//! 4. The editor's in-memory graph and the persisted document never
//!    diverge

pub mod core;
pub mod editor;
pub mod engine;
pub mod store;
