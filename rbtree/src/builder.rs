//! Construction-time configuration for [`RedBlackTree`].

use crate::policy::{Compare, Destroy, DropPayload, Natural};
use crate::tree::RedBlackTree;

/// Fixes a tree's ordering and cleanup policies, and its initial node capacity, before the
/// first entry goes in.
///
/// ```rust
/// use rbtree::{Reversed, TreeBuilder};
///
/// let mut freed = Vec::new();
/// {
///     let mut tree = TreeBuilder::new()
///         .compare(Reversed)
///         .destroy(|v: String| freed.push(v))
///         .capacity(16)
///         .build();
///     tree.insert(1, "a".to_string()).unwrap();
///     tree.insert(2, "b".to_string()).unwrap();
///     assert_eq!(tree.minimum().map(|(k, _)| *k), Ok(2));
/// }
/// assert_eq!(freed.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TreeBuilder<C = Natural, D = DropPayload> {
    compare: C,
    destroy: D,
    capacity: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            compare: Natural,
            destroy: DropPayload,
            capacity: 0,
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> TreeBuilder<C, D> {
    /// Order keys with `compare` instead of their [`Ord`] implementation.
    pub fn compare<C2>(self, compare: C2) -> TreeBuilder<C2, D> {
        TreeBuilder {
            compare,
            destroy: self.destroy,
            capacity: self.capacity,
        }
    }

    /// Run `destroy` on every payload the tree releases through `delete` or teardown.
    pub fn destroy<D2>(self, destroy: D2) -> TreeBuilder<C, D2> {
        TreeBuilder {
            compare: self.compare,
            destroy,
            capacity: self.capacity,
        }
    }

    /// Reserve room for `capacity` nodes up front.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn build<K, V>(self) -> RedBlackTree<K, V, C, D>
    where
        C: Compare<K>,
        D: Destroy<V>,
    {
        RedBlackTree::from_parts(self.compare, self.destroy, self.capacity)
    }
}
