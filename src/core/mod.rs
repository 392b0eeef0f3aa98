//! core
//!
//! Core domain types and derived structure for the decision graph.
//!
//! # Modules
//!
//! - [`id`] - Validated hierarchical node identifiers
//! - [`graph`] - Graph, node, and choice data model
//! - [`topology`] - Parent/child/sibling index derived from node ids
//! - [`alloc`] - Next-free-slot id allocation
//! - [`verify`] - Graph validation
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid ids at construction time
//! - Hierarchy is derived from ids, never stored as pointers
//! - Everything here is deterministic and mutation-free

pub mod alloc;
pub mod graph;
pub mod id;
pub mod topology;
pub mod verify;
