//! Linked Binary Heap implementation
//!
//! A binary min-heap whose complete-tree shape is held in explicit parent/left/right
//! links instead of array indices. Nodes are stored in a [`SlotMap`] arena and link to
//! each other through [`NodeKey`]s, so no reference cycles arise between a node and
//! its parent.
//!
//! # Addressing
//!
//! The i-th node in level order (1-indexed) is reached by writing `i` in binary,
//! dropping the leading 1, and reading the remaining bits from the top: `0` descends
//! left, `1` descends right. Insertion attaches below position `(len + 1) / 2` on the
//! side given by the lowest bit of `len + 1`; extraction takes the node at position
//! `len` as the replacement root.
//!
//! # Restoring order
//!
//! Sift-up and sift-down never exchange keys or values between nodes. They relink the
//! node with its parent, rewriting up to six links so the child takes the parent's
//! place in the tree.
//!
//! # Time Complexity
//!
//! | Operation     | Complexity |
//! |---------------|------------|
//! | `insert`      | O(log n)   |
//! | `extract_min` | O(log n)   |
//! | `peek_min`    | O(1)       |
//! | `is_full`     | O(log n)   |
//!
//! # Example
//!
//! ```rust
//! use linked_binary_heap::LinkedBinaryHeap;
//!
//! let mut heap = LinkedBinaryHeap::new(5, "five");
//! heap.insert(3, "three");
//! heap.insert(8, "eight");
//!
//! assert_eq!(heap.peek_min(), (&3, &"three"));
//! assert_eq!(heap.extract_min(), Ok((3, "three")));
//! assert_eq!(heap.extract_min(), Ok((5, "five")));
//! // The final node stays; a heap is never empty.
//! assert!(heap.extract_min().is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;

use log::{debug, trace};
use slotmap::SlotMap;

use crate::error::{HeapError, InvariantViolation};
use crate::node::{Node, NodeKey, Side};

/// Yields the descent from the root to level-order `position` (1-indexed)
fn path(position: usize) -> impl Iterator<Item = Side> {
    debug_assert!(position >= 1, "level-order positions start at 1");
    let steps = level_of(position);
    (0..steps).rev().map(move |shift| Side::from_bit(position >> shift))
}

/// Level of a 1-indexed position, counted from the root at level 0
#[inline]
fn level_of(position: usize) -> usize {
    (usize::BITS - 1 - position.leading_zeros()) as usize
}

/// A binary min-heap built from linked nodes
///
/// The heap always holds at least one node: it is constructed with a seed entry and
/// [`extract_min`](Self::extract_min) refuses to remove the last one. Use
/// [`into_sorted_vec`](Self::into_sorted_vec) to drain everything.
#[derive(Debug, Clone)]
pub struct LinkedBinaryHeap<K, V = K> {
    nodes: SlotMap<NodeKey, Node<K, V>>,
    root: NodeKey,
    len: usize,
    /// Level of the deepest node; always `floor(log2(len))`
    depth: usize,
}

impl<K: Ord, V> LinkedBinaryHeap<K, V> {
    /// Creates a heap holding a single entry
    pub fn new(key: K, value: V) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(key, value));
        Self {
            nodes,
            root,
            len: 1,
            depth: 0,
        }
    }

    /// Returns the minimum key and its value without removing them
    pub fn peek_min(&self) -> (&K, &V) {
        let root = self.peek_node();
        (root.key(), root.value())
    }

    /// Returns the number of nodes in the heap (at least 1)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the level of the deepest node, with the root at level 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true if every level of the tree is fully populated
    ///
    /// Walks the rightmost branch; it reaches the deepest level only when the last
    /// level is full.
    pub fn is_full(&self) -> bool {
        let mut current = self.root;
        let mut steps = 0;
        while let Some(right) = self.nodes[current].right() {
            current = right;
            steps += 1;
        }
        steps == self.depth
    }

    /// Inserts a key/value pair
    pub fn insert(&mut self, key: K, value: V) {
        let position = self.len + 1;
        // The new level can't be detected after attaching, so sample fullness first
        let was_full = self.is_full();

        let parent = self.descend(position >> 1);
        let node = self.nodes.insert(Node::new(key, value));
        self.nodes[node].set_parent(Some(parent));
        self.nodes[parent].set_child(Side::from_bit(position), Some(node));
        trace!("attached {:?} at level-order position {}", node, position);

        self.len += 1;
        if was_full {
            self.depth += 1;
            debug!("heap grew to depth {} at len {}", self.depth, self.len);
        }

        self.sift_up(node);
        self.check_invariants("insert");
    }

    /// Removes and returns the minimum key and its value
    ///
    /// # Errors
    /// Returns [`HeapError::SoleNode`] if the heap holds a single node.
    pub fn extract_min(&mut self) -> Result<(K, V), HeapError> {
        if self.len == 1 {
            return Err(HeapError::SoleNode);
        }

        let last = self.descend(self.len);
        let last_parent = self.nodes[last]
            .parent()
            .expect("last node of a multi-node heap has a parent");
        self.nodes[last_parent].set_child(Side::from_bit(self.len), None);

        // Detached first, so the removed root no longer lists `last` as a child
        let old_root = self
            .nodes
            .remove(self.root)
            .expect("root is always present in the arena");
        let (left, right) = (old_root.left(), old_root.right());

        let new_root = &mut self.nodes[last];
        new_root.set_parent(None);
        new_root.set_left(left);
        new_root.set_right(right);
        for child in [left, right].into_iter().flatten() {
            self.nodes[child].set_parent(Some(last));
        }
        self.root = last;
        trace!("moved {:?} from position {} to the root", last, self.len);

        self.len -= 1;
        if (self.len + 1).is_power_of_two() {
            self.depth -= 1;
            debug!("heap shrank to depth {} at len {}", self.depth, self.len);
        }

        self.sift_down();
        self.check_invariants("extract_min");
        Ok(old_root.into_entry())
    }

    /// Consumes the heap, returning every entry in non-decreasing key order
    pub fn into_sorted_vec(mut self) -> Vec<(K, V)> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Ok(entry) = self.extract_min() {
            sorted.push(entry);
        }
        if let Some(last) = self.nodes.remove(self.root) {
            sorted.push(last.into_entry());
        }
        sorted
    }

    /// Checks shape, order, back-links, length and depth of the linked tree
    ///
    /// # Errors
    /// Returns [`HeapError::Invariant`] describing the first violation found.
    pub fn validate(&self) -> Result<(), HeapError> {
        let root = self
            .nodes
            .get(self.root)
            .ok_or(InvariantViolation::BrokenBackLink)?;
        if root.parent().is_some() {
            return Err(InvariantViolation::BrokenBackLink.into());
        }

        let mut reachable = 0;
        let mut height = 0;
        let mut queue = VecDeque::from([(self.root, 1usize)]);
        while let Some((key, position)) = queue.pop_front() {
            // Positions past `len` mean a gap earlier in level order
            if position > self.len {
                return Err(InvariantViolation::NotComplete.into());
            }
            reachable += 1;
            height = height.max(level_of(position));

            let node = &self.nodes[key];
            for (side, child) in [(Side::Left, node.left()), (Side::Right, node.right())] {
                let Some(child) = child else { continue };
                let child_node = self
                    .nodes
                    .get(child)
                    .ok_or(InvariantViolation::BrokenBackLink)?;
                if child_node.parent() != Some(key) {
                    return Err(InvariantViolation::BrokenBackLink.into());
                }
                if child_node.key() < node.key() {
                    return Err(InvariantViolation::OrderViolated.into());
                }
                let offset = usize::from(side == Side::Right);
                queue.push_back((child, 2 * position + offset));
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::LenMismatch {
                expected: self.len,
                found: reachable,
            }
            .into());
        }
        if self.nodes.len() != self.len {
            return Err(InvariantViolation::LenMismatch {
                expected: self.len,
                found: self.nodes.len(),
            }
            .into());
        }
        if height != self.depth {
            return Err(InvariantViolation::DepthMismatch {
                expected: self.depth,
                found: height,
            }
            .into());
        }
        Ok(())
    }

    /// Follows the bit-path of a level-order position down from the root
    fn descend(&self, position: usize) -> NodeKey {
        path(position).fold(self.root, |current, side| {
            self.nodes[current]
                .child(side)
                .expect("level-order position lies within the tree")
        })
    }

    /// Moves `node` up while its parent has a larger key
    fn sift_up(&mut self, node: NodeKey) {
        while let Some(parent) = self.nodes[node].parent() {
            if self.nodes[parent].key() <= self.nodes[node].key() {
                break;
            }
            self.swap_with_parent(node, parent);
        }
    }

    /// Moves the root down while it has a child with a smaller key
    fn sift_down(&mut self) {
        let current = self.root;
        loop {
            let node = &self.nodes[current];
            let candidate = match (node.left(), node.right()) {
                (Some(left), Some(right)) => {
                    if self.nodes[left].key() <= self.nodes[right].key() {
                        left
                    } else {
                        right
                    }
                }
                (Some(left), None) => left,
                _ => break,
            };
            if node.key() <= self.nodes[candidate].key() {
                break;
            }
            self.swap_with_parent(candidate, current);
        }
    }

    /// Swaps `child` with its parent by relinking, promoting `child` one level
    ///
    /// # Errors
    /// Returns [`HeapError::RootHasNoParent`] if `child` is the root.
    #[cfg(test)]
    fn relink_with_parent(&mut self, child: NodeKey) -> Result<(), HeapError> {
        let parent = self.nodes[child]
            .parent()
            .ok_or(HeapError::RootHasNoParent)?;
        self.swap_with_parent(child, parent);
        Ok(())
    }

    /// Rewrites the links between `child`, `parent`, the sibling, the grandparent and
    /// the grandchildren so that `child` occupies `parent`'s former slot
    ///
    /// All links are read before any is written.
    fn swap_with_parent(&mut self, child: NodeKey, parent: NodeKey) {
        let grand_parent = self.nodes[parent].parent();
        let was_left = self.nodes[parent].left() == Some(child);
        let child_left = self.nodes[child].left();
        let child_right = self.nodes[child].right();
        trace!("relinking {:?} above {:?}", child, parent);

        let sibling = if was_left {
            let sibling = self.nodes[parent].right();
            self.nodes[child].set_left(Some(parent));
            self.nodes[child].set_right(sibling);
            sibling
        } else {
            let sibling = self.nodes[parent].left();
            self.nodes[child].set_right(Some(parent));
            self.nodes[child].set_left(sibling);
            sibling
        };
        if let Some(sibling) = sibling {
            self.nodes[sibling].set_parent(Some(child));
        }

        self.nodes[child].set_parent(grand_parent);
        self.nodes[parent].set_parent(Some(child));
        self.nodes[parent].set_left(child_left);
        self.nodes[parent].set_right(child_right);
        for grandchild in [child_left, child_right].into_iter().flatten() {
            self.nodes[grandchild].set_parent(Some(parent));
        }

        match grand_parent {
            Some(grand_parent) => {
                let side = if self.nodes[grand_parent].left() == Some(parent) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.nodes[grand_parent].set_child(side, Some(child));
            }
            None => self.root = child,
        }
    }

    #[inline]
    fn check_invariants(&self, operation: &str) {
        if cfg!(any(debug_assertions, feature = "invariant-checks")) {
            if let Err(err) = self.validate() {
                panic!("{} left the heap inconsistent: {}", operation, err);
            }
        }
    }
}

impl<K: Ord + Clone> LinkedBinaryHeap<K, K> {
    /// Creates a heap whose single entry uses the key as its value
    pub fn with_key(key: K) -> Self {
        Self::new(key.clone(), key)
    }

    /// Inserts a key, using the key as its value
    pub fn insert_key(&mut self, key: K) {
        self.insert(key.clone(), key);
    }
}

impl<K, V> LinkedBinaryHeap<K, V> {
    /// Returns the key of the root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Returns the node behind `key`, or `None` if it is not in this heap
    pub fn node(&self, key: NodeKey) -> Option<&Node<K, V>> {
        self.nodes.get(key)
    }

    /// Returns the root node, whose links lead to the rest of the tree
    pub fn peek_node(&self) -> &Node<K, V> {
        &self.nodes[self.root]
    }

    /// Iterates over entries in level order, starting at the root
    pub fn iter(&self) -> LevelOrder<'_, K, V> {
        LevelOrder {
            nodes: &self.nodes,
            queue: VecDeque::from([self.root]),
            remaining: self.len,
        }
    }
}

impl<K: Ord, V> Extend<(K, V)> for LinkedBinaryHeap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Renders one line per level, keys separated by spaces
impl<K: fmt::Display, V> fmt::Display for LinkedBinaryHeap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, _)) in self.iter().enumerate() {
            let position = index + 1;
            if position > 1 {
                let separator = if position.is_power_of_two() { '\n' } else { ' ' };
                write!(f, "{}", separator)?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

/// Level-order iterator over a [`LinkedBinaryHeap`]
///
/// Created by [`LinkedBinaryHeap::iter`].
pub struct LevelOrder<'a, K, V> {
    nodes: &'a SlotMap<NodeKey, Node<K, V>>,
    queue: VecDeque<NodeKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for LevelOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.queue.pop_front()?;
        let nodes = self.nodes;
        let node = &nodes[key];
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for LevelOrder<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a LinkedBinaryHeap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = LevelOrder<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
