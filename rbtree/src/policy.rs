//! Ordering and payload cleanup policies.
//!
//! A tree is parameterized over one [`Compare`] and one [`Destroy`] strategy. Both are
//! fixed when the tree is built; see [`crate::builder::TreeBuilder`]. Closures work
//! for either:
//!
//! ```rust
//! use rbtree::TreeBuilder;
//!
//! let mut tree = TreeBuilder::new()
//!     .compare(|a: &i32, b: &i32| b.cmp(a))
//!     .build::<i32, &str>();
//! tree.insert(1, "one").unwrap();
//! tree.insert(2, "two").unwrap();
//! assert_eq!(tree.minimum().unwrap(), (&2, &"two"));
//! ```

use std::cmp::Ordering;

/// Total order over keys. Must be consistent for the lifetime of the tree.
pub trait Compare<K> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Cleanup callback run on a payload when the tree releases it, either through
/// `delete` or teardown.
pub trait Destroy<V> {
    fn destroy(&mut self, value: V);
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

/// Orders keys by the reverse of their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reversed;

/// No custom cleanup: released payloads are simply dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropPayload;

impl<K: Ord> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: Ord> Compare<K> for Reversed {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

impl<V> Destroy<V> for DropPayload {
    #[inline]
    fn destroy(&mut self, value: V) {
        drop(value);
    }
}

impl<V, F> Destroy<V> for F
where
    F: FnMut(V),
{
    #[inline]
    fn destroy(&mut self, value: V) {
        self(value)
    }
}
