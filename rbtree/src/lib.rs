//! # rbtree - a sentinel-based red-black tree
//!
//! An ordered associative container with O(log n) insert, search and delete, plus ordered
//! stepping (minimum, maximum, successor, predecessor). Ordering and payload cleanup are
//! pluggable policies fixed when the tree is built.
//!
//! ```rust
//! use rbtree::{OrderedTree, RedBlackTree, TreeError};
//!
//! fn fill<T: OrderedTree<u32, &'static str>>(tree: &mut T) -> Result<(), TreeError> {
//!     tree.insert(2, "two")?;
//!     tree.insert(1, "one")?;
//!     tree.insert(3, "three")
//! }
//!
//! let mut tree: RedBlackTree<u32, &str> = RedBlackTree::new();
//! fill(&mut tree).unwrap();
//! assert_eq!(tree.size(), 3);
//! assert_eq!(tree.predecessor(&2), Ok((&1, &"one")));
//! ```

mod balance;
pub mod builder;
pub mod error;
mod navigate;
mod node;
pub mod policy;
pub mod stats;
pub mod tree;

pub use builder::TreeBuilder;
pub use error::TreeError;
pub use policy::{Compare, Destroy, DropPayload, Natural, Reversed};
pub use stats::{InvariantViolation, TreeStats, TreeStatsTrait};
pub use tree::RedBlackTree;

/// The operation set shared by ordered tree variants.
///
/// Entry lookups report [`TreeError::NoData`] rather than `None` so every variant speaks the
/// same error vocabulary.
pub trait OrderedTree<K, V> {
    fn insert(&mut self, key: K, value: V) -> Result<(), TreeError>;

    fn search(&self, key: &K) -> Result<&V, TreeError>;

    fn delete(&mut self, key: &K) -> Result<(), TreeError>;

    fn minimum(&self) -> Result<(&K, &V), TreeError>;

    fn maximum(&self) -> Result<(&K, &V), TreeError>;

    fn successor(&self, key: &K) -> Result<(&K, &V), TreeError>;

    fn predecessor(&self, key: &K) -> Result<(&K, &V), TreeError>;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
