//! Read-only walks over the tree structure.
//!
//! All of these return [`NodeId::SENTINEL`] for "nothing here" and never mutate the tree.

use std::cmp::Ordering;

use crate::node::NodeId;
use crate::policy::{Compare, Destroy};
use crate::tree::RedBlackTree;

impl<K, V, C, D> RedBlackTree<K, V, C, D>
where
    C: Compare<K>,
    D: Destroy<V>,
{
    /// Node whose key compares equal to `key`.
    pub(crate) fn find(&self, key: &K) -> NodeId {
        let mut cur = self.root;
        while !cur.is_sentinel() {
            cur = match self.compare.compare(key, self.nodes[cur].key()) {
                Ordering::Less => self.nodes.left(cur),
                Ordering::Greater => self.nodes.right(cur),
                Ordering::Equal => return cur,
            };
        }
        cur
    }
}

impl<K, V, C, D> RedBlackTree<K, V, C, D>
where
    D: Destroy<V>,
{
    /// Leftmost node of the subtree rooted at `id`.
    pub(crate) fn minimum_from(&self, mut id: NodeId) -> NodeId {
        if id.is_sentinel() {
            return id;
        }
        loop {
            let left = self.nodes.left(id);
            if left.is_sentinel() {
                return id;
            }
            id = left;
        }
    }

    /// Rightmost node of the subtree rooted at `id`.
    pub(crate) fn maximum_from(&self, mut id: NodeId) -> NodeId {
        if id.is_sentinel() {
            return id;
        }
        loop {
            let right = self.nodes.right(id);
            if right.is_sentinel() {
                return id;
            }
            id = right;
        }
    }

    pub(crate) fn successor_of(&self, mut id: NodeId) -> NodeId {
        if id.is_sentinel() {
            return id;
        }
        let right = self.nodes.right(id);
        if !right.is_sentinel() {
            return self.minimum_from(right);
        }
        // Climb until we arrive from a left subtree.
        let mut parent = self.nodes.parent(id);
        while !parent.is_sentinel() && id == self.nodes.right(parent) {
            id = parent;
            parent = self.nodes.parent(id);
        }
        parent
    }

    pub(crate) fn predecessor_of(&self, mut id: NodeId) -> NodeId {
        if id.is_sentinel() {
            return id;
        }
        let left = self.nodes.left(id);
        if !left.is_sentinel() {
            return self.maximum_from(left);
        }
        let mut parent = self.nodes.parent(id);
        while !parent.is_sentinel() && id == self.nodes.left(parent) {
            id = parent;
            parent = self.nodes.parent(id);
        }
        parent
    }
}
