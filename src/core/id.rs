//! core::id
//!
//! Hierarchical node identifiers.
//!
//! # Format
//!
//! A node id is a non-empty sequence of positive integers joined by `.`:
//! `"1"`, `"1.2"`, `"1.2.3"`. The id simultaneously encodes the node's
//! position in the tree (each segment is a 1-based slot among its level's
//! siblings) and serves as the stable reference other nodes' choices point
//! at. No parent pointers are ever stored; ancestry is derived from the id
//! alone.
//!
//! # Validation
//!
//! Ids are validated at construction time. Invalid values cannot be
//! represented, so everything above this module (topology, allocator,
//! migration engine) may assume well-formed ids. Rejected at the boundary:
//! empty input, empty segments (`"1..2"`), non-digit segments, zero, and
//! non-canonical spellings (`"01"`, `"+1"`).
//!
//! # Ordering
//!
//! Ids order by segmentwise integer comparison, with absent trailing
//! segments ranking lowest. This is **not** string ordering: `"1.2"` sorts
//! before `"1.10"`, and `"2"` before `"10"`.
//!
//! # Examples
//!
//! ```
//! use branchpoint::core::id::NodeId;
//!
//! let id = NodeId::new("1.2.3").unwrap();
//! assert_eq!(id.depth(), 2);
//! assert_eq!(id.parent().unwrap().to_string(), "1.2");
//!
//! assert!(NodeId::new("1.2").unwrap() < NodeId::new("1.10").unwrap());
//!
//! assert!(NodeId::new("").is_err());
//! assert!(NodeId::new("1..2").is_err());
//! assert!(NodeId::new("1.0").is_err());
//! assert!(NodeId::new("01").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from id validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("node id cannot be empty")]
    Empty,

    #[error("node id contains an empty segment: {0:?}")]
    EmptySegment(String),

    #[error("node id segment is not a positive integer: {0:?}")]
    InvalidSegment(String),
}

/// A validated hierarchical node identifier.
///
/// Internally a sequence of positive integer segments; renders as the
/// dot-joined text form. Serializes as that text and validates on
/// deserialization.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(Vec<u32>);

impl NodeId {
    /// Parse and validate a node id from its text form.
    ///
    /// # Errors
    ///
    /// Returns `IdError` if the text is empty, has an empty segment, or has
    /// a segment that is not a canonical positive integer.
    pub fn new(text: impl AsRef<str>) -> Result<Self, IdError> {
        let text = text.as_ref();
        if text.is_empty() {
            return Err(IdError::Empty);
        }
        let mut segments = Vec::new();
        for part in text.split('.') {
            if part.is_empty() {
                return Err(IdError::EmptySegment(text.to_string()));
            }
            segments.push(Self::parse_segment(part)?);
        }
        Ok(Self(segments))
    }

    /// Parse one segment as a canonical positive integer.
    fn parse_segment(part: &str) -> Result<u32, IdError> {
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidSegment(part.to_string()));
        }
        // "0" and leading zeros would not round-trip through display
        if part.starts_with('0') {
            return Err(IdError::InvalidSegment(part.to_string()));
        }
        part.parse::<u32>()
            .map_err(|_| IdError::InvalidSegment(part.to_string()))
    }

    /// A root id with the given first segment.
    ///
    /// Only called with positive slot numbers (the allocator and the
    /// migration engine number slots from 1).
    pub(crate) fn root(slot: u32) -> Self {
        debug_assert!(slot > 0);
        Self(vec![slot])
    }

    /// The child id at the given 1-based slot under this id.
    pub fn child(&self, slot: u32) -> Self {
        debug_assert!(slot > 0);
        let mut segments = self.0.clone();
        segments.push(slot);
        Self(segments)
    }

    /// The parent id (last segment dropped), or `None` for a root.
    pub fn parent(&self) -> Option<NodeId> {
        if self.0.len() <= 1 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Depth below the root level: roots are 0, their children 1, etc.
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    /// Whether this id sits at the root level (single segment).
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Whether `other` lies strictly inside this id's subtree.
    ///
    /// True iff this id's segments are a strict prefix of `other`'s. An id
    /// is not its own ancestor.
    pub fn is_ancestor_of(&self, other: &NodeId) -> bool {
        other.0.len() > self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// The first segment (the root slot this id lives under).
    pub fn first_segment(&self) -> u32 {
        self.0[0]
    }

    /// The last segment (this id's slot among its siblings).
    pub fn last_segment(&self) -> u32 {
        self.0[self.0.len() - 1]
    }

    /// The integer segments, root-most first.
    pub fn segments(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({self})")
    }
}

impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NodeId {
    type Error = IdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> String {
        id.to_string()
    }
}
