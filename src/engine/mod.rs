//! engine
//!
//! The migration engine: atomic, reference-consistent subtree moves.
//!
//! # Architecture
//!
//! Every move follows a uniform shape:
//!
//! ```text
//! Validate -> Index -> Splice -> Renumber -> Rewrite references
//! ```
//!
//! Validation rejects unknown ids, cycle-creating destinations, and
//! non-positive positions before any structural work. The remaining steps
//! operate on a freshly derived topology index and produce a brand-new node
//! collection; the input is never touched.
//!
//! # Invariants
//!
//! - The engine performs no I/O and no persistence
//! - A move either yields a complete, valid relabeled collection or a typed
//!   error with no partial output

pub mod migrate;

pub use migrate::{migrate, MigrateError};
