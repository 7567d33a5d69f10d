//! Linked heap nodes
//!
//! Nodes live in the heap's [`SlotMap`](slotmap::SlotMap) arena and refer to one
//! another by [`NodeKey`]. A key stored in `left`/`right` is the owning slot for that
//! child; a key stored in `parent` is only a back-reference for upward traversal.
//! Only the heap rewires links, so the mutators are crate-private.

use slotmap::new_key_type;

new_key_type! {
    /// Arena key identifying a node in a [`LinkedBinaryHeap`](crate::LinkedBinaryHeap)
    pub struct NodeKey;
}

/// Which child slot of a parent a node occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Maps one bit of a level-order bit-path to a child slot: 0 is left, 1 is right
    #[inline]
    pub fn from_bit(bit: usize) -> Self {
        if bit & 1 == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// A key/value cell with parent and child links
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    key: K,
    value: V,
    parent: Option<NodeKey>,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable access to the payload; the key stays fixed so heap order is unaffected
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeKey> {
        self.left
    }

    pub fn right(&self) -> Option<NodeKey> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<NodeKey> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeKey>) {
        self.parent = parent;
    }

    pub(crate) fn set_left(&mut self, left: Option<NodeKey>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<NodeKey>) {
        self.right = right;
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeKey>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Consumes the node, returning its key and value
    pub fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}
