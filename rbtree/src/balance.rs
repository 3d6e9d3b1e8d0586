//! Rotations and the insert/delete repair passes.
//!
//! Everything here is pointer surgery on the arena: no comparator calls, no allocation. Each
//! public mutation on [`RedBlackTree`] finishes by running one of the fixups, after which the
//! red-black properties hold again:
//!
//! 1. every node is red or black, the sentinel is black
//! 2. a red node has no red child
//! 3. every path from a node down to the sentinel crosses the same number of black nodes
//! 4. a non-empty tree has a black root

use log::trace;

use crate::node::{Color, NodeId};
use crate::policy::Destroy;
use crate::tree::RedBlackTree;

impl<K, V, C, D> RedBlackTree<K, V, C, D>
where
    D: Destroy<V>,
{
    /// Left rotation around `x`; `x.right` must not be the sentinel.
    ///
    /// ```text
    ///     x              y
    ///    / \            / \
    ///   a   y    =>    x   c
    ///      / \        / \
    ///     b   c      a   b
    /// ```
    pub(crate) fn rotate_left(&mut self, x: NodeId) {
        let y = self.nodes.right(x);
        debug_assert!(!y.is_sentinel(), "rotate_left needs a right child");

        let b = self.nodes.left(y);
        self.nodes.set_right(x, b);
        self.nodes.set_parent(b, x);

        let parent = self.nodes.parent(x);
        self.nodes.set_parent(y, parent);
        self.replace_child(parent, x, y);

        self.nodes.set_left(y, x);
        self.nodes.set_parent(x, y);
    }

    /// Right rotation around `y`; mirror of [`rotate_left`](Self::rotate_left).
    ///
    /// ```text
    ///       y          x
    ///      / \        / \
    ///     x   c  =>  a   y
    ///    / \            / \
    ///   a   b          b   c
    /// ```
    pub(crate) fn rotate_right(&mut self, y: NodeId) {
        let x = self.nodes.left(y);
        debug_assert!(!x.is_sentinel(), "rotate_right needs a left child");

        let b = self.nodes.right(x);
        self.nodes.set_left(y, b);
        self.nodes.set_parent(b, y);

        let parent = self.nodes.parent(y);
        self.nodes.set_parent(x, parent);
        self.replace_child(parent, y, x);

        self.nodes.set_right(x, y);
        self.nodes.set_parent(y, x);
    }

    /// Point whichever link of `parent` held `old` at `new`, or the root if `parent` is the
    /// sentinel. Does not touch `new`'s parent link.
    #[inline]
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent.is_sentinel() {
            self.root = new;
        } else if self.nodes.left(parent) == old {
            self.nodes.set_left(parent, new);
        } else {
            self.nodes.set_right(parent, new);
        }
    }

    /// Put the subtree rooted at `v` where the subtree rooted at `u` was.
    pub(crate) fn transplant(&mut self, u: NodeId, v: NodeId) {
        let parent = self.nodes.parent(u);
        self.replace_child(parent, u, v);
        self.nodes.set_parent(v, parent);
    }

    /// Restore the red-red property after `z` was linked in as a red leaf.
    pub(crate) fn insert_fixup(&mut self, mut z: NodeId) {
        while self.nodes.is_red(self.nodes.parent(z)) {
            let parent = self.nodes.parent(z);
            // A red parent is never the root, so the grandparent is a real node.
            let grandparent = self.nodes.parent(parent);

            if parent == self.nodes.left(grandparent) {
                let uncle = self.nodes.right(grandparent);
                if self.nodes.is_red(uncle) {
                    trace!("insert fixup: red uncle, recolor at {grandparent:?}");
                    self.nodes.set_color(parent, Color::Black);
                    self.nodes.set_color(uncle, Color::Black);
                    self.nodes.set_color(grandparent, Color::Red);
                    z = grandparent;
                    continue;
                }
                if z == self.nodes.right(parent) {
                    trace!("insert fixup: inner child, rotate at {parent:?}");
                    z = parent;
                    self.rotate_left(z);
                }
                let parent = self.nodes.parent(z);
                let grandparent = self.nodes.parent(parent);
                trace!("insert fixup: outer child, rotate at {grandparent:?}");
                self.nodes.set_color(parent, Color::Black);
                self.nodes.set_color(grandparent, Color::Red);
                self.rotate_right(grandparent);
            } else {
                let uncle = self.nodes.left(grandparent);
                if self.nodes.is_red(uncle) {
                    trace!("insert fixup: red uncle, recolor at {grandparent:?}");
                    self.nodes.set_color(parent, Color::Black);
                    self.nodes.set_color(uncle, Color::Black);
                    self.nodes.set_color(grandparent, Color::Red);
                    z = grandparent;
                    continue;
                }
                if z == self.nodes.left(parent) {
                    trace!("insert fixup: inner child, rotate at {parent:?}");
                    z = parent;
                    self.rotate_right(z);
                }
                let parent = self.nodes.parent(z);
                let grandparent = self.nodes.parent(parent);
                trace!("insert fixup: outer child, rotate at {grandparent:?}");
                self.nodes.set_color(parent, Color::Black);
                self.nodes.set_color(grandparent, Color::Red);
                self.rotate_left(grandparent);
            }
        }
        let root = self.root;
        self.nodes.set_color(root, Color::Black);
    }

    /// Unlink node `z` and return its entry.
    ///
    /// When `z` has two children its in-order successor `y` is spliced out of its own spot
    /// instead, and `y`'s entry moves into `z`. Exactly one slot is released either way.
    pub(crate) fn remove_node(&mut self, z: NodeId) -> (K, V) {
        let left = self.nodes.left(z);
        let right = self.nodes.right(z);

        let y = if left.is_sentinel() || right.is_sentinel() {
            z
        } else {
            self.minimum_from(right)
        };

        // y has at most one real child; x takes its place.
        let x = if self.nodes.left(y).is_sentinel() {
            self.nodes.right(y)
        } else {
            self.nodes.left(y)
        };
        let x_parent = self.nodes.parent(y);
        let removed_color = self.nodes.color(y);

        self.transplant(y, x);

        if y != z {
            let moved = self.nodes[y].entry.take();
            let evicted = std::mem::replace(&mut self.nodes[z].entry, moved);
            self.nodes[y].entry = evicted;
        }
        let entry = self.nodes.release(y);
        self.len -= 1;

        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }
        entry
    }

    /// Repair the missing black on every path through `x` after a black node was spliced out.
    ///
    /// `x` may be the sentinel, so its parent is carried separately instead of being read back
    /// from the sentinel's links.
    pub(crate) fn delete_fixup(&mut self, mut x: NodeId, mut parent: NodeId) {
        while x != self.root && self.nodes.is_black(x) {
            if x == self.nodes.left(parent) {
                let mut w = self.nodes.right(parent);
                if self.nodes.is_red(w) {
                    trace!("delete fixup: red sibling, rotate at {parent:?}");
                    self.nodes.set_color(w, Color::Black);
                    self.nodes.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    w = self.nodes.right(parent);
                }
                if self.nodes.is_black(self.nodes.left(w)) && self.nodes.is_black(self.nodes.right(w))
                {
                    trace!("delete fixup: black nephews, move deficiency up from {parent:?}");
                    self.nodes.set_color(w, Color::Red);
                    x = parent;
                    parent = self.nodes.parent(x);
                    continue;
                }
                if self.nodes.is_black(self.nodes.right(w)) {
                    trace!("delete fixup: near nephew red, rotate at {w:?}");
                    let near = self.nodes.left(w);
                    self.nodes.set_color(near, Color::Black);
                    self.nodes.set_color(w, Color::Red);
                    self.rotate_right(w);
                    w = self.nodes.right(parent);
                }
                trace!("delete fixup: far nephew red, rotate at {parent:?}");
                let parent_color = self.nodes.color(parent);
                self.nodes.set_color(w, parent_color);
                self.nodes.set_color(parent, Color::Black);
                let far = self.nodes.right(w);
                self.nodes.set_color(far, Color::Black);
                self.rotate_left(parent);
                x = self.root;
            } else {
                let mut w = self.nodes.left(parent);
                if self.nodes.is_red(w) {
                    trace!("delete fixup: red sibling, rotate at {parent:?}");
                    self.nodes.set_color(w, Color::Black);
                    self.nodes.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    w = self.nodes.left(parent);
                }
                if self.nodes.is_black(self.nodes.right(w)) && self.nodes.is_black(self.nodes.left(w))
                {
                    trace!("delete fixup: black nephews, move deficiency up from {parent:?}");
                    self.nodes.set_color(w, Color::Red);
                    x = parent;
                    parent = self.nodes.parent(x);
                    continue;
                }
                if self.nodes.is_black(self.nodes.left(w)) {
                    trace!("delete fixup: near nephew red, rotate at {w:?}");
                    let near = self.nodes.right(w);
                    self.nodes.set_color(near, Color::Black);
                    self.nodes.set_color(w, Color::Red);
                    self.rotate_left(w);
                    w = self.nodes.left(parent);
                }
                trace!("delete fixup: far nephew red, rotate at {parent:?}");
                let parent_color = self.nodes.color(parent);
                self.nodes.set_color(w, parent_color);
                self.nodes.set_color(parent, Color::Black);
                let far = self.nodes.left(w);
                self.nodes.set_color(far, Color::Black);
                self.rotate_right(parent);
                x = self.root;
            }
        }
        self.nodes.set_color(x, Color::Black);
    }
}
