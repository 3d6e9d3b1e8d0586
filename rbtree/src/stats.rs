//! Statistics and structural checks for [`RedBlackTree`].
//!
//! Statistics can be useful for:
//! - Confirming the height bound on real workloads
//! - Understanding arena slot reuse after heavy deletion
//! - Debugging balancing issues, together with [`RedBlackTree::validate`]

use std::cmp::Ordering;

use thiserror::Error;

use crate::node::{Color, NodeId};
use crate::policy::{Compare, Destroy};
use crate::tree::RedBlackTree;

pub trait TreeStatsTrait {
    fn get_tree_stats(&self) -> TreeStats;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub num_entries: usize,
    pub num_red: usize,
    pub num_black: usize,
    /// Nodes on the longest root-to-leaf path.
    pub max_height: usize,
    /// Black nodes on any path from the root down to the sentinel, counting the sentinel but
    /// not the root.
    pub black_height: usize,
    pub free_slots: usize,
    pub arena_capacity: usize,
}

/// A red-black property or structural link found broken by [`RedBlackTree::validate`].
///
/// `node` is the arena index of the offending node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("the sentinel is not black")]
    RedSentinel,
    #[error("the root is red")]
    RedRoot,
    #[error("red node {node} has a red child")]
    RedRed { node: usize },
    #[error("black-height differs between the subtrees of node {node}")]
    BlackHeight { node: usize },
    #[error("node {node} is not ordered strictly after its in-order predecessor")]
    Order { node: usize },
    #[error("child link and parent link of node {node} disagree")]
    ParentLink { node: usize },
    #[error("size counter says {recorded} but {reachable} nodes are reachable")]
    Size { recorded: usize, reachable: usize },
}

impl<K, V, C, D> RedBlackTree<K, V, C, D>
where
    D: Destroy<V>,
{
    /// Nodes on the longest path from the root down to a leaf. Zero for an empty tree.
    pub fn height(&self) -> usize {
        if self.root.is_sentinel() {
            return 0;
        }
        let mut max = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            for child in [self.nodes.left(id), self.nodes.right(id)] {
                if !child.is_sentinel() {
                    stack.push((child, depth + 1));
                }
            }
        }
        max
    }

    /// Checks links and colors below `id`, returning its black-height (sentinel included).
    fn check_subtree(&self, id: NodeId, reachable: &mut usize) -> Result<usize, InvariantViolation> {
        if id.is_sentinel() {
            return Ok(0);
        }
        *reachable += 1;
        let left = self.nodes.left(id);
        let right = self.nodes.right(id);
        for child in [left, right] {
            if child.is_sentinel() {
                continue;
            }
            if self.nodes.parent(child) != id {
                return Err(InvariantViolation::ParentLink {
                    node: child.index(),
                });
            }
            if self.nodes.is_red(id) && self.nodes.is_red(child) {
                return Err(InvariantViolation::RedRed { node: id.index() });
            }
        }
        let lh = self.check_subtree(left, reachable)? + usize::from(self.nodes.is_black(left));
        let rh = self.check_subtree(right, reachable)? + usize::from(self.nodes.is_black(right));
        if lh != rh {
            return Err(InvariantViolation::BlackHeight { node: id.index() });
        }
        Ok(lh)
    }
}

impl<K, V, C, D> RedBlackTree<K, V, C, D>
where
    C: Compare<K>,
    D: Destroy<V>,
{
    /// Verify every red-black property plus link consistency, key order and the size
    /// counter. Returns the black-height of the root.
    ///
    /// Runs in O(n); meant for tests and debugging, not for hot paths.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        if self.nodes.color(NodeId::SENTINEL) != Color::Black {
            return Err(InvariantViolation::RedSentinel);
        }
        if self.nodes.is_red(self.root) {
            return Err(InvariantViolation::RedRoot);
        }
        if !self.root.is_sentinel() && !self.nodes.parent(self.root).is_sentinel() {
            return Err(InvariantViolation::ParentLink {
                node: self.root.index(),
            });
        }

        let mut reachable = 0;
        let black_height = self.check_subtree(self.root, &mut reachable)?;
        if reachable != self.len {
            return Err(InvariantViolation::Size {
                recorded: self.len,
                reachable,
            });
        }

        let mut prev = self.minimum_from(self.root);
        let mut cur = self.successor_of(prev);
        while !cur.is_sentinel() {
            if self.compare.compare(self.nodes[prev].key(), self.nodes[cur].key()) != Ordering::Less
            {
                return Err(InvariantViolation::Order { node: cur.index() });
            }
            prev = cur;
            cur = self.successor_of(cur);
        }

        Ok(black_height)
    }
}

impl<K, V, C, D> TreeStatsTrait for RedBlackTree<K, V, C, D>
where
    D: Destroy<V>,
{
    fn get_tree_stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            num_entries: self.len,
            free_slots: self.nodes.free_slots(),
            arena_capacity: self.nodes.capacity(),
            max_height: self.height(),
            ..Default::default()
        };

        if self.root.is_sentinel() {
            return stats;
        }

        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.nodes.color(id) {
                Color::Red => stats.num_red += 1,
                Color::Black => stats.num_black += 1,
            }
            for child in [self.nodes.left(id), self.nodes.right(id)] {
                if !child.is_sentinel() {
                    stack.push(child);
                }
            }
        }

        // Follow the left spine; every path carries the same count in a valid tree.
        let mut cur = self.nodes.left(self.root);
        loop {
            if self.nodes.is_black(cur) {
                stats.black_height += 1;
            }
            if cur.is_sentinel() {
                break;
            }
            cur = self.nodes.left(cur);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{Color, NodeId};
    use crate::stats::{InvariantViolation, TreeStats, TreeStatsTrait};
    use crate::tree::RedBlackTree;

    #[test]
    fn test_empty_stats() {
        let tree = RedBlackTree::<u8, u8>::new();
        let stats = tree.get_tree_stats();
        assert_eq!(stats.num_entries, 0);
        assert_eq!(stats.max_height, 0);
        assert_eq!(stats.black_height, 0);
        assert_eq!(tree.validate(), Ok(0));
    }

    #[test]
    fn test_stats_after_inserts_and_deletes() {
        let mut tree = RedBlackTree::new();
        for k in 0..100u32 {
            tree.insert(k, k).unwrap();
        }
        for k in 0..40u32 {
            tree.delete(&k).unwrap();
        }
        let stats = tree.get_tree_stats();
        assert_eq!(stats.num_entries, 60);
        assert_eq!(stats.num_red + stats.num_black, 60);
        assert_eq!(stats.free_slots, 40);
        assert!(stats.max_height <= 2 * 6 + 1);

        assert_eq!(Ok(stats.black_height), tree.validate());
    }

    #[test]
    fn test_single_entry_black_height() {
        let mut tree = RedBlackTree::new();
        tree.insert("k", ()).unwrap();
        assert_eq!(tree.validate(), Ok(1));
        assert_eq!(
            tree.get_tree_stats(),
            TreeStats {
                num_entries: 1,
                num_red: 0,
                num_black: 1,
                max_height: 1,
                black_height: 1,
                free_slots: 0,
                arena_capacity: tree.get_tree_stats().arena_capacity,
            }
        );
    }

    #[test]
    fn test_validate_detects_red_root() {
        let mut tree = RedBlackTree::new();
        tree.insert(1, ()).unwrap();
        let root = tree.root;
        tree.nodes[root].color = Color::Red;
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot));
    }

    #[test]
    fn test_validate_detects_red_red_and_black_height() {
        let mut tree = RedBlackTree::new();
        for k in [2, 1, 3] {
            tree.insert(k, ()).unwrap();
        }
        let root = tree.root;
        let left = tree.nodes.left(root);
        let right = tree.nodes.right(root);

        // Blacken one child only: the two sides now disagree.
        tree.nodes[left].color = Color::Black;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::BlackHeight { node: root.index() })
        );

        tree.nodes[left].color = Color::Red;
        tree.insert(4, ()).unwrap();
        let four = tree.nodes.right(right);
        tree.nodes[right].color = Color::Red;
        tree.nodes[four].color = Color::Red;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::RedRed { node: right.index() })
        );
    }

    #[test]
    fn test_validate_detects_bad_links_and_order() {
        let mut tree = RedBlackTree::new();
        for k in [2, 1, 3] {
            tree.insert(k, ()).unwrap();
        }
        let root = tree.root;
        let left = tree.nodes.left(root);
        let right = tree.nodes.right(root);

        tree.nodes[left].parent = right;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::ParentLink { node: left.index() })
        );
        tree.nodes[left].parent = root;

        tree.nodes[left].entry = Some((5, ()));
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::Order { node: root.index() })
        );
        tree.nodes[left].entry = Some((1, ()));

        tree.len = 7;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::Size {
                recorded: 7,
                reachable: 3
            })
        );
        tree.len = 3;
        assert_eq!(tree.validate(), Ok(1));
        assert_eq!(tree.nodes.parent(tree.root), NodeId::SENTINEL);
    }
}
