//! Error types for heap operations
//!
//! Two kinds of failure exist:
//!
//! - Precondition violations ([`HeapError::SoleNode`], [`HeapError::RootHasNoParent`]):
//!   the caller asked for something the heap's contract forbids.
//! - Invariant violations ([`HeapError::Invariant`]): reported by
//!   [`LinkedBinaryHeap::validate`](crate::LinkedBinaryHeap::validate) when the
//!   linked structure no longer describes a complete, heap-ordered tree. These
//!   indicate a bug in the heap itself, never a usage error.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `extract_min` was called while the heap holds a single node
    SoleNode,
    /// The root was asked to swap places with its (nonexistent) parent
    RootHasNoParent,
    /// A structural check failed
    Invariant(InvariantViolation),
}

impl HeapError {
    /// Returns true for errors caused by breaking the heap's calling contract
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, HeapError::SoleNode | HeapError::RootHasNoParent)
    }
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::SoleNode => {
                write!(f, "cannot extract from a heap holding a single node")
            }
            HeapError::RootHasNoParent => {
                write!(f, "cannot relink the root with its parent")
            }
            HeapError::Invariant(violation) => {
                write!(f, "heap invariant violated: {}", violation)
            }
        }
    }
}

impl std::error::Error for HeapError {}

impl From<InvariantViolation> for HeapError {
    fn from(violation: InvariantViolation) -> Self {
        HeapError::Invariant(violation)
    }
}

/// The specific structural invariant that failed to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The number of reachable nodes differs from the tracked length
    LenMismatch { expected: usize, found: usize },
    /// The tracked depth differs from the height of the tree
    DepthMismatch { expected: usize, found: usize },
    /// A node sits outside the complete-tree positions `1..=len`
    NotComplete,
    /// Some child has a smaller key than its parent
    OrderViolated,
    /// A child's parent link does not point back at the node holding it
    BrokenBackLink,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::LenMismatch { expected, found } => {
                write!(f, "tracked length {} but {} nodes are reachable", expected, found)
            }
            InvariantViolation::DepthMismatch { expected, found } => {
                write!(f, "tracked depth {} but tree height is {}", expected, found)
            }
            InvariantViolation::NotComplete => write!(f, "tree is not complete"),
            InvariantViolation::OrderViolated => write!(f, "a child is smaller than its parent"),
            InvariantViolation::BrokenBackLink => {
                write!(f, "a parent link disagrees with its child slot")
            }
        }
    }
}
