//! Red-black tree implementation.
//!
//! This module contains the tree handle, [`RedBlackTree`], and its public operation set. The
//! balancing machinery lives in `balance`, the read-only walks in `navigate`.

use std::cmp::Ordering;
use std::fmt;

use crate::OrderedTree;
use crate::builder::TreeBuilder;
use crate::error::TreeError;
use crate::node::{Arena, NodeId};
use crate::policy::{Compare, Destroy, DropPayload, Natural};

/// An ordered map kept balanced by the red-black discipline.
///
/// Every operation that descends the tree costs O(log n) comparator calls. Keys are unique
/// under the tree's comparator; inserting an equal key is rejected rather than replacing the
/// stored entry.
///
/// ## Type Parameters
///
/// - `K`: key type, ordered by `C`
/// - `V`: payload type, released through `D`
/// - `C`: the [`Compare`] policy, [`Natural`] by default
/// - `D`: the [`Destroy`] policy, [`DropPayload`] by default
///
/// ## Examples
///
/// ```rust
/// use rbtree::{RedBlackTree, TreeError};
///
/// let mut tree = RedBlackTree::new();
/// for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
///     tree.insert(k, k * 10).unwrap();
/// }
///
/// assert_eq!(tree.search(&4), Ok(&40));
/// assert_eq!(tree.insert(5, 0), Err(TreeError::DataConflict));
/// assert_eq!(tree.minimum(), Ok((&1, &10)));
/// assert_eq!(tree.successor(&4), Ok((&5, &50)));
/// assert_eq!(tree.successor(&9), Err(TreeError::NoData));
///
/// tree.delete(&5).unwrap();
/// assert_eq!(tree.size(), 8);
/// ```
pub struct RedBlackTree<K, V, C = Natural, D = DropPayload>
where
    D: Destroy<V>,
{
    pub(crate) nodes: Arena<K, V>,
    pub(crate) root: NodeId,
    pub(crate) len: usize,
    pub(crate) compare: C,
    pub(crate) destroy: D,
}

impl<K: Ord, V> RedBlackTree<K, V> {
    /// Create a new empty tree ordered by `K`'s [`Ord`] implementation.
    pub fn new() -> Self {
        TreeBuilder::new().build()
    }
}

impl<K: Ord, V> Default for RedBlackTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, D> RedBlackTree<K, V, C, D>
where
    C: Compare<K>,
    D: Destroy<V>,
{
    pub(crate) fn from_parts(compare: C, destroy: D, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: NodeId::SENTINEL,
            len: 0,
            compare,
            destroy,
        }
    }

    /// Insert `value` under `key`.
    ///
    /// # Errors
    ///
    /// - [`TreeError::DataConflict`] if an equal key is already stored. The stored entry is
    ///   left untouched and the rejected pair is dropped without running the destructor.
    /// - [`TreeError::NoMemory`] if no node could be allocated. The tree is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError> {
        let mut parent = NodeId::SENTINEL;
        let mut cur = self.root;
        let mut order = Ordering::Equal;
        while !cur.is_sentinel() {
            parent = cur;
            order = self.compare.compare(&key, self.nodes[cur].key());
            cur = match order {
                Ordering::Less => self.nodes.left(cur),
                Ordering::Greater => self.nodes.right(cur),
                Ordering::Equal => return Err(TreeError::DataConflict),
            };
        }

        let id = self.nodes.alloc(key, value)?;
        self.nodes.set_parent(id, parent);
        if parent.is_sentinel() {
            self.root = id;
        } else if order == Ordering::Less {
            self.nodes.set_left(parent, id);
        } else {
            self.nodes.set_right(parent, id);
        }
        self.len += 1;

        self.insert_fixup(id);
        Ok(())
    }

    /// Get the payload stored under `key`.
    pub fn search(&self, key: &K) -> Result<&V, TreeError> {
        let id = self.find(key);
        match &self.nodes[id].entry {
            Some((_, v)) => Ok(v),
            None => Err(TreeError::NoData),
        }
    }

    /// Get a mutable reference to the payload stored under `key`.
    pub fn search_mut(&mut self, key: &K) -> Result<&mut V, TreeError> {
        let id = self.find(key);
        match &mut self.nodes[id].entry {
            Some((_, v)) => Ok(v),
            None => Err(TreeError::NoData),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        !self.find(key).is_sentinel()
    }

    /// Delete the entry stored under `key`, handing its payload to the destructor.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoData`] if no entry matches. The tree is unchanged.
    pub fn delete(&mut self, key: &K) -> Result<(), TreeError> {
        let (_, value) = self.remove(key)?;
        self.destroy.destroy(value);
        Ok(())
    }

    /// Unlink the entry stored under `key` and give it back to the caller.
    ///
    /// Unlike [`delete`](Self::delete), the destructor does not run: ownership of the payload
    /// passes to the caller.
    pub fn remove(&mut self, key: &K) -> Result<(K, V), TreeError> {
        let id = self.find(key);
        if id.is_sentinel() {
            return Err(TreeError::NoData);
        }
        Ok(self.remove_node(id))
    }

    /// Entry with the smallest key.
    pub fn minimum(&self) -> Result<(&K, &V), TreeError> {
        self.entry_at(self.minimum_from(self.root))
    }

    /// Entry with the largest key.
    pub fn maximum(&self) -> Result<(&K, &V), TreeError> {
        self.entry_at(self.maximum_from(self.root))
    }

    /// Entry whose key immediately follows `key`.
    ///
    /// Reports [`TreeError::NoData`] when `key` is not stored or is the maximum.
    pub fn successor(&self, key: &K) -> Result<(&K, &V), TreeError> {
        let id = self.find(key);
        if id.is_sentinel() {
            return Err(TreeError::NoData);
        }
        self.entry_at(self.successor_of(id))
    }

    /// Entry whose key immediately precedes `key`.
    ///
    /// Reports [`TreeError::NoData`] when `key` is not stored or is the minimum.
    pub fn predecessor(&self, key: &K) -> Result<(&K, &V), TreeError> {
        let id = self.find(key);
        if id.is_sentinel() {
            return Err(TreeError::NoData);
        }
        self.entry_at(self.predecessor_of(id))
    }

    /// Replace the ordering policy. Only allowed while the tree is empty.
    pub fn set_compare(&mut self, compare: C) -> Result<(), TreeError> {
        if !self.is_empty() {
            log::debug!("rejected comparator change on tree holding {} entries", self.len);
            return Err(TreeError::NotEmpty);
        }
        self.compare = compare;
        Ok(())
    }

    /// Replace the payload cleanup policy. Only allowed while the tree is empty.
    pub fn set_destroy(&mut self, destroy: D) -> Result<(), TreeError> {
        if !self.is_empty() {
            log::debug!("rejected destructor change on tree holding {} entries", self.len);
            return Err(TreeError::NotEmpty);
        }
        self.destroy = destroy;
        Ok(())
    }
}

impl<K, V, C, D> RedBlackTree<K, V, C, D>
where
    D: Destroy<V>,
{
    /// Number of stored entries. O(1).
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Release every entry, running the destructor on each payload. The tree stays usable.
    pub fn clear(&mut self) {
        self.teardown();
    }

    /// Tear the tree down, running the destructor once per stored payload.
    ///
    /// Equivalent to dropping the tree; provided to make the end of its lifetime explicit.
    pub fn deinit(self) {
        drop(self);
    }

    /// Iterative post-order release of every node.
    ///
    /// Only child links are followed. The work stack never grows deeper than the tree is
    /// tall, so pathological shapes cannot exhaust the call stack.
    fn teardown(&mut self) {
        if self.root.is_sentinel() {
            return;
        }
        let released = self.len;
        let mut stack = vec![self.root];
        while let Some(&cur) = stack.last() {
            let left = self.nodes.left(cur);
            let right = self.nodes.right(cur);
            if !left.is_sentinel() {
                stack.push(left);
            } else if !right.is_sentinel() {
                stack.push(right);
            } else {
                let parent = self.nodes.parent(cur);
                if parent.is_sentinel() {
                    self.root = NodeId::SENTINEL;
                } else if self.nodes.left(parent) == cur {
                    self.nodes.set_left(parent, NodeId::SENTINEL);
                } else {
                    self.nodes.set_right(parent, NodeId::SENTINEL);
                }
                let (_, value) = self.nodes.release(cur);
                self.destroy.destroy(value);
                self.len -= 1;
                stack.pop();
            }
        }
        debug_assert_eq!(self.len, 0);
        self.nodes.reset();
        log::debug!("released {released} entries");
    }
}

// Internals shared by the public operations.
impl<K, V, C, D> RedBlackTree<K, V, C, D>
where
    D: Destroy<V>,
{
    #[inline]
    pub(crate) fn entry_at(&self, id: NodeId) -> Result<(&K, &V), TreeError> {
        match &self.nodes[id].entry {
            Some((k, v)) => Ok((k, v)),
            None => Err(TreeError::NoData),
        }
    }
}

impl<K, V, C, D> Drop for RedBlackTree<K, V, C, D>
where
    D: Destroy<V>,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<K, V, C, D> fmt::Debug for RedBlackTree<K, V, C, D>
where
    K: fmt::Debug,
    V: fmt::Debug,
    D: Destroy<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        let mut cur = self.minimum_from(self.root);
        while let Ok((k, v)) = self.entry_at(cur) {
            map.entry(k, v);
            cur = self.successor_of(cur);
        }
        map.finish()
    }
}

impl<K, V, C, D> OrderedTree<K, V> for RedBlackTree<K, V, C, D>
where
    C: Compare<K>,
    D: Destroy<V>,
{
    fn insert(&mut self, key: K, value: V) -> Result<(), TreeError> {
        RedBlackTree::insert(self, key, value)
    }

    fn search(&self, key: &K) -> Result<&V, TreeError> {
        RedBlackTree::search(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<(), TreeError> {
        RedBlackTree::delete(self, key)
    }

    fn minimum(&self) -> Result<(&K, &V), TreeError> {
        RedBlackTree::minimum(self)
    }

    fn maximum(&self) -> Result<(&K, &V), TreeError> {
        RedBlackTree::maximum(self)
    }

    fn successor(&self, key: &K) -> Result<(&K, &V), TreeError> {
        RedBlackTree::successor(self, key)
    }

    fn predecessor(&self, key: &K) -> Result<(&K, &V), TreeError> {
        RedBlackTree::predecessor(self, key)
    }

    fn size(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::cmp::Ordering;
    use std::rc::Rc;

    use crate::builder::TreeBuilder;
    use crate::error::TreeError;
    use crate::node::NodeId;
    use crate::policy::{Destroy, Natural};
    use crate::tree::RedBlackTree;

    fn in_order<K: Clone, V, C, D: Destroy<V>>(tree: &RedBlackTree<K, V, C, D>) -> Vec<K> {
        let mut keys = Vec::new();
        let mut cur = tree.minimum_from(tree.root);
        while let Ok((k, _)) = tree.entry_at(cur) {
            keys.push(k.clone());
            cur = tree.successor_of(cur);
        }
        keys
    }

    #[test]
    fn test_root_insert_search() {
        let mut tree = RedBlackTree::new();
        assert_eq!(tree.insert("abc", 1), Ok(()));
        assert_eq!(tree.search(&"abc"), Ok(&1));
        assert_eq!(tree.size(), 1);
        assert!(tree.nodes.is_black(tree.root));
    }

    #[test]
    fn test_empty_tree_reports_no_data() {
        let mut tree = RedBlackTree::<u32, u32>::new();
        assert_eq!(tree.search(&1), Err(TreeError::NoData));
        assert_eq!(tree.delete(&1), Err(TreeError::NoData));
        assert_eq!(tree.minimum(), Err(TreeError::NoData));
        assert_eq!(tree.maximum(), Err(TreeError::NoData));
        assert_eq!(tree.successor(&1), Err(TreeError::NoData));
        assert_eq!(tree.predecessor(&1), Err(TreeError::NoData));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_in_order_after_inserts() {
        let mut tree = RedBlackTree::new();
        for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
            tree.insert(k, ()).unwrap();
        }
        assert_eq!(in_order(&tree), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut tree = RedBlackTree::new();
        tree.insert(5, "first").unwrap();
        assert_eq!(tree.insert(5, "second"), Err(TreeError::DataConflict));
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.search(&5), Ok(&"first"));
    }

    #[test]
    fn test_search_mut() {
        let mut tree = RedBlackTree::new();
        tree.insert(1, String::from("a")).unwrap();
        tree.search_mut(&1).unwrap().push('b');
        assert_eq!(tree.search(&1).map(String::as_str), Ok("ab"));
        assert_eq!(tree.search_mut(&2), Err(TreeError::NoData));
    }

    #[test]
    fn test_remove_returns_entry() {
        let mut tree = RedBlackTree::new();
        for k in 0..10 {
            tree.insert(k, k * 2).unwrap();
        }
        assert_eq!(tree.remove(&4), Ok((4, 8)));
        assert_eq!(tree.remove(&4), Err(TreeError::NoData));
        assert!(!tree.contains_key(&4));
        assert_eq!(tree.size(), 9);
        assert_eq!(in_order(&tree), vec![0, 1, 2, 3, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_delete_all_leaves_sentinel_root() {
        let mut tree = RedBlackTree::new();
        for k in 0..64 {
            tree.insert(k, k).unwrap();
        }
        for k in (0..64).rev().step_by(2).chain((0..64).step_by(2)) {
            tree.delete(&k).unwrap();
        }
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.root, NodeId::SENTINEL);
        tree.insert(100, 100).unwrap();
        assert_eq!(tree.minimum(), Ok((&100, &100)));
    }

    type DynCompare = Box<dyn Fn(&i32, &i32) -> Ordering>;

    #[test]
    fn test_set_policy_only_while_empty() {
        let natural: DynCompare = Box::new(|a: &i32, b: &i32| a.cmp(b));
        let mut tree = TreeBuilder::new().compare(natural).build::<i32, ()>();
        assert_eq!(tree.set_compare(Box::new(|a: &i32, b: &i32| b.cmp(a))), Ok(()));
        tree.insert(1, ()).unwrap();
        tree.insert(2, ()).unwrap();
        assert_eq!(tree.minimum(), Ok((&2, &())));
        assert_eq!(
            tree.set_compare(Box::new(|a: &i32, b: &i32| a.cmp(b))),
            Err(TreeError::NotEmpty)
        );

        let mut plain = RedBlackTree::<i32, ()>::new();
        plain.insert(1, ()).unwrap();
        assert_eq!(plain.set_compare(Natural), Err(TreeError::NotEmpty));
        plain.delete(&1).unwrap();
        assert_eq!(plain.set_compare(Natural), Ok(()));
    }

    #[test]
    fn test_destructor_runs_on_delete_and_teardown() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&destroyed);
        let mut tree = TreeBuilder::new()
            .destroy(move |v: u32| sink.borrow_mut().push(v))
            .build::<u32, u32>();
        for k in 0..20 {
            tree.insert(k, k + 100).unwrap();
        }
        tree.delete(&3).unwrap();
        assert_eq!(*destroyed.borrow(), vec![103]);

        // Removed entries belong to the caller.
        assert_eq!(tree.remove(&4), Ok((4, 104)));
        assert_eq!(destroyed.borrow().len(), 1);

        tree.deinit();
        let mut seen = destroyed.borrow().clone();
        seen.sort_unstable();
        let mut expected: Vec<u32> = (0..20).filter(|k| *k != 4).map(|k| k + 100).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_clear_keeps_tree_usable() {
        let count = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&count);
        let mut tree = TreeBuilder::new()
            .destroy(move |_: String| *counter.borrow_mut() += 1)
            .build::<i32, String>();
        for k in 0..50 {
            tree.insert(k, k.to_string()).unwrap();
        }
        tree.clear();
        assert_eq!(*count.borrow(), 50);
        assert!(tree.is_empty());
        assert_eq!(tree.root, NodeId::SENTINEL);

        tree.insert(7, "seven".to_string()).unwrap();
        assert_eq!(tree.search(&7).map(String::as_str), Ok("seven"));
        drop(tree);
        assert_eq!(*count.borrow(), 51);
    }

    #[test]
    fn test_debug_lists_entries_in_order() {
        let mut tree = RedBlackTree::new();
        tree.insert(2, 'b').unwrap();
        tree.insert(1, 'a').unwrap();
        tree.insert(3, 'c').unwrap();
        assert_eq!(format!("{tree:?}"), "{1: 'a', 2: 'b', 3: 'c'}");
    }
}
