use std::ops::{Index, IndexMut};

use crate::error::TreeError;

/// Position of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

impl NodeId {
    /// The per-tree sentinel: "no child" and "no parent of root".
    pub(crate) const SENTINEL: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

pub(crate) struct Node<K, V> {
    /// `None` only for the sentinel and for slots on the free list.
    pub(crate) entry: Option<(K, V)>,
    pub(crate) color: Color,
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

impl<K, V> Node<K, V> {
    #[inline]
    fn vacant() -> Self {
        Self {
            entry: None,
            color: Color::Black,
            parent: NodeId::SENTINEL,
            left: NodeId::SENTINEL,
            right: NodeId::SENTINEL,
        }
    }

    #[inline]
    fn new_red(key: K, value: V) -> Self {
        Self {
            entry: Some((key, value)),
            color: Color::Red,
            parent: NodeId::SENTINEL,
            left: NodeId::SENTINEL,
            right: NodeId::SENTINEL,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        match &self.entry {
            Some((k, _)) => k,
            None => unreachable!("sentinel or vacant slot has no key"),
        }
    }
}

/// Owns every node of one tree, including its sentinel at slot 0.
///
/// Links are plain indices, so parent pointers never take part in ownership. Slots released
/// by deletion go on a free list and are handed out again before the arena grows.
pub(crate) struct Arena<K, V> {
    slots: Vec<Node<K, V>>,
    free: Vec<NodeId>,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(1));
        slots.push(Node::vacant());
        Self {
            slots,
            free: Vec::new(),
        }
    }

    /// Stores a new red node with both children on the sentinel.
    ///
    /// Fails without touching the arena if there is no room to grow.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> Result<NodeId, TreeError> {
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Node::new_red(key, value);
            return Ok(id);
        }
        if self.slots.try_reserve(1).is_err() {
            log::debug!("arena of {} slots failed to grow", self.slots.len());
            return Err(TreeError::NoMemory);
        }
        // Keep room on the free list for this slot so releasing it never allocates.
        if self.free.try_reserve(self.slots.len()).is_err() {
            return Err(TreeError::NoMemory);
        }
        self.slots.push(Node::new_red(key, value));
        Ok(NodeId(self.slots.len() - 1))
    }

    /// Takes the entry out of `id` and recycles its slot.
    pub(crate) fn release(&mut self, id: NodeId) -> (K, V) {
        debug_assert!(!id.is_sentinel(), "the sentinel is never released");
        let node = std::mem::replace(&mut self.slots[id.0], Node::vacant());
        self.free.push(id);
        match node.entry {
            Some(entry) => entry,
            None => unreachable!("released a vacant slot"),
        }
    }

    /// Drops every slot except the sentinel.
    pub(crate) fn reset(&mut self) {
        self.slots.truncate(1);
        self.free.clear();
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.slots[id.0].color
    }

    /// Recolors `id`. The sentinel stays black whatever is asked of it.
    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        if id.is_sentinel() {
            debug_assert_eq!(color, Color::Black, "the sentinel cannot turn red");
            return;
        }
        self.slots[id.0].color = color;
    }

    #[inline]
    pub(crate) fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    #[inline]
    pub(crate) fn is_black(&self, id: NodeId) -> bool {
        self.color(id) == Color::Black
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.slots[id.0].parent
    }

    #[inline]
    pub(crate) fn left(&self, id: NodeId) -> NodeId {
        self.slots[id.0].left
    }

    #[inline]
    pub(crate) fn right(&self, id: NodeId) -> NodeId {
        self.slots[id.0].right
    }

    /// Points `id` at a new parent. Writes aimed at the sentinel are dropped.
    #[inline]
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if !id.is_sentinel() {
            self.slots[id.0].parent = parent;
        }
    }

    #[inline]
    pub(crate) fn set_left(&mut self, id: NodeId, child: NodeId) {
        debug_assert!(!id.is_sentinel());
        self.slots[id.0].left = child;
    }

    #[inline]
    pub(crate) fn set_right(&mut self, id: NodeId, child: NodeId) {
        debug_assert!(!id.is_sentinel());
        self.slots[id.0].right = child;
    }

    /// Number of slots currently sitting on the free list.
    pub(crate) fn free_slots(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity().saturating_sub(1)
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.slots[id.0]
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.slots[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::{Arena, Color, NodeId};

    #[test]
    fn test_sentinel_is_black_and_fixed() {
        let mut arena = Arena::<u32, u32>::with_capacity(4);
        assert!(arena.is_black(NodeId::SENTINEL));
        arena.set_color(NodeId::SENTINEL, Color::Black);
        arena.set_parent(NodeId::SENTINEL, NodeId(3));
        assert_eq!(arena.parent(NodeId::SENTINEL), NodeId::SENTINEL);
        assert!(arena[NodeId::SENTINEL].entry.is_none());
    }

    #[test]
    fn test_alloc_starts_red_with_sentinel_links() {
        let mut arena = Arena::with_capacity(0);
        let id = arena.alloc(5, "five").unwrap();
        assert!(!id.is_sentinel());
        assert!(arena.is_red(id));
        assert_eq!(arena.left(id), NodeId::SENTINEL);
        assert_eq!(arena.right(id), NodeId::SENTINEL);
        assert_eq!(arena.parent(id), NodeId::SENTINEL);
        assert_eq!(*arena[id].key(), 5);
    }

    #[test]
    fn test_release_recycles_slots() {
        let mut arena = Arena::with_capacity(2);
        let a = arena.alloc(1, 10).unwrap();
        let b = arena.alloc(2, 20).unwrap();
        assert_ne!(a, b);

        assert_eq!(arena.release(a), (1, 10));
        assert_eq!(arena.free_slots(), 1);

        let c = arena.alloc(3, 30).unwrap();
        assert_eq!(c, a);
        assert_eq!(arena.free_slots(), 0);
        assert_eq!(arena[c].entry, Some((3, 30)));
    }

    #[test]
    fn test_reset_keeps_sentinel() {
        let mut arena = Arena::with_capacity(0);
        for i in 0..8 {
            arena.alloc(i, i).unwrap();
        }
        arena.reset();
        let id = arena.alloc(42, 0).unwrap();
        assert_eq!(id.index(), 1);
        assert!(arena.is_black(NodeId::SENTINEL));
    }
}
