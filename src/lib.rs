//! Linked Binary Heap for Rust
//!
//! This crate provides a binary min-heap whose complete-tree structure is kept in
//! explicitly linked nodes (key, value, parent, left, right) rather than in a flat
//! array. Positions in level order are located by bit-path descent from the root, and
//! heap order is restored by relinking nodes with their parents instead of swapping
//! stored values.
//!
//! # Features
//!
//! - **Insert**: O(log n), attaches at the next complete-tree position and sifts up
//! - **Extract-min**: O(log n), promotes the last node to the root and sifts down
//! - **Peek-min**: O(1)
//! - **Tree inspection**: read-only access to every [`Node`] and its links
//!
//! The heap is never empty: it is created from a seed entry, and
//! [`extract_min`](LinkedBinaryHeap::extract_min) on a single-node heap returns
//! [`HeapError::SoleNode`].
//!
//! # Example
//!
//! ```rust
//! use linked_binary_heap::LinkedBinaryHeap;
//!
//! let mut heap = LinkedBinaryHeap::with_key(5);
//! for key in [3, 8, 1, 9, 2] {
//!     heap.insert_key(key);
//! }
//! assert_eq!(heap.peek_min(), (&1, &1));
//! assert_eq!(heap.len(), 6);
//! assert_eq!(heap.depth(), 2);
//!
//! let mut extracted = Vec::new();
//! while let Ok((key, _)) = heap.extract_min() {
//!     extracted.push(key);
//! }
//! assert_eq!(extracted, vec![1, 2, 3, 5, 8]);
//! assert_eq!(heap.peek_min(), (&9, &9));
//! ```

pub mod error;
pub mod heap;
pub mod node;

pub use error::{HeapError, InvariantViolation};
pub use heap::{LevelOrder, LinkedBinaryHeap};
pub use node::{Node, NodeKey, Side};
