//! Doubly linked list over an index arena.
//!
//! Nodes live in a `Vec` of generation-tagged slots and link to each other by
//! slot index, so there are no owning cycles. Callers address nodes through
//! [`NodeId`] handles. A handle names the list that issued it and goes stale
//! once its slot is freed; foreign and stale handles are rejected instead of
//! aliasing whatever occupies the slot. A slot whose generation is exhausted
//! is retired rather than reused.
//!
//! - add / add_node / remove_node / remove_first / move_to: O(1)
//! - find: O(n)

use std::fmt;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to a node allocated in a [`LinkedList`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    list: u64,
    index: usize,
    generation: u32,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}:{}v{})", self.list, self.index, self.generation)
    }
}

/// End of the list an insertion targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Position {
    First,
    #[default]
    Last,
}

struct Node<T> {
    data: T,
    prev: Option<usize>,
    next: Option<usize>,
    linked: bool,
}

struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

pub struct LinkedList<T> {
    /// Stamped into every handle this list issues
    id: u64,
    /// Storage for nodes (using indices instead of pointers for safety)
    slots: Vec<Slot<T>>,
    /// Free list of slot indices
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Linked nodes only; detached nodes are not counted
    len: usize,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Wrap `data` in a new node and link it at `position`.
    pub fn add(&mut self, data: T, position: Position) -> NodeId {
        let id = self.create_node(data);
        self.link(id.index, position);
        id
    }

    pub fn push_front(&mut self, data: T) -> NodeId {
        self.add(data, Position::First)
    }

    pub fn push_back(&mut self, data: T) -> NodeId {
        self.add(data, Position::Last)
    }

    /// Allocate a detached node. It joins the sequence once passed to
    /// [`add_node`](Self::add_node).
    pub fn create_node(&mut self, data: T) -> NodeId {
        let node = Node {
            data,
            prev: None,
            next: None,
            linked: false,
        };
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return NodeId {
                list: self.id,
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            list: self.id,
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Link a detached node at `position`.
    ///
    /// Fails with [`Error::NodeLinked`] if the node is already part of the
    /// sequence, and with [`Error::UnknownNode`] for a stale handle.
    pub fn add_node(&mut self, id: NodeId, position: Position) -> Result<NodeId> {
        if self.node(id)?.linked {
            return Err(Error::NodeLinked(id));
        }
        self.link(id.index, position);
        Ok(id)
    }

    /// Unlink `id` from the sequence and re-stitch its neighbours.
    ///
    /// The node stays allocated and the handle stays valid, so it can be
    /// re-linked with [`add_node`](Self::add_node) or freed with
    /// [`take`](Self::take).
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        if !self.node(id)?.linked {
            return Err(Error::NodeDetached(id));
        }
        self.unlink(id.index);
        Ok(())
    }

    /// Relocate a linked node to either end without reallocating it.
    pub fn move_to(&mut self, id: NodeId, position: Position) -> Result<()> {
        let boundary = match position {
            Position::First => self.head,
            Position::Last => self.tail,
        };
        if boundary == Some(id.index) && self.node(id)?.linked {
            return Ok(());
        }
        self.remove_node(id)?;
        self.link(id.index, position);
        Ok(())
    }

    /// Free a node, unlinking it first if needed, and hand back its data.
    pub fn take(&mut self, id: NodeId) -> Result<T> {
        if self.node(id)?.linked {
            self.unlink(id.index);
        }
        self.release(id.index).ok_or(Error::UnknownNode(id))
    }

    pub fn remove_first(&mut self) -> Option<T> {
        let index = self.head?;
        self.unlink(index);
        self.release(index)
    }

    pub fn remove_last(&mut self) -> Option<T> {
        let index = self.tail?;
        self.unlink(index);
        self.release(index)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.head.map(|index| self.id_at(index))
    }

    pub fn last(&self) -> Option<NodeId> {
        self.tail.map(|index| self.id_at(index))
    }

    pub fn front(&self) -> Option<&T> {
        self.data_at(self.head?)
    }

    pub fn back(&self) -> Option<&T> {
        self.data_at(self.tail?)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).ok().map(|node| &node.data)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).ok().map(|node| &mut node.data)
    }

    pub fn is_linked(&self, id: NodeId) -> bool {
        self.node(id).map(|node| node.linked).unwrap_or(false)
    }

    pub fn next_of(&self, id: NodeId) -> Option<NodeId> {
        let next = self.node(id).ok()?.next?;
        Some(self.id_at(next))
    }

    pub fn prev_of(&self, id: NodeId) -> Option<NodeId> {
        let prev = self.node(id).ok()?.prev?;
        Some(self.id_at(prev))
    }

    /// First node from the head whose data equals `data`. O(n)
    pub fn find(&self, data: &T) -> Option<NodeId>
    where
        T: PartialEq,
    {
        self.find_by(|candidate| candidate == data)
    }

    /// First node from the head whose data satisfies `matches`. O(n)
    pub fn find_by<F>(&self, mut matches: F) -> Option<NodeId>
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let node = self.slots[index].node.as_ref()?;
            if matches(&node.data) {
                return Some(self.id_at(index));
            }
            cursor = node.next;
        }
        None
    }

    /// Head-to-tail iterator; `.rev()` walks tail-to-head.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Drop every node, linked or detached. All issued handles go stale.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            if self.slots[index].node.take().is_some() {
                self.recycle(index);
            }
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn node(&self, id: NodeId) -> Result<&Node<T>> {
        if id.list != self.id {
            return Err(Error::UnknownNode(id));
        }
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(Error::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>> {
        if id.list != self.id {
            return Err(Error::UnknownNode(id));
        }
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(Error::UnknownNode(id))
    }

    fn id_at(&self, index: usize) -> NodeId {
        NodeId {
            list: self.id,
            index,
            generation: self.slots[index].generation,
        }
    }

    fn data_at(&self, index: usize) -> Option<&T> {
        self.slots[index].node.as_ref().map(|node| &node.data)
    }

    fn release(&mut self, index: usize) -> Option<T> {
        let node = self.slots[index].node.take()?;
        self.recycle(index);
        Some(node.data)
    }

    /// Bump the generation of an emptied slot and make it reusable. A slot at
    /// `u32::MAX` stays empty for good so no old handle can match it again.
    fn recycle(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if let Some(generation) = slot.generation.checked_add(1) {
            slot.generation = generation;
            self.free_list.push(index);
        }
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = match self.slots[index].node.as_ref() {
            Some(node) if node.linked => (node.prev, node.next),
            _ => return,
        };

        if let Some(prev_idx) = prev {
            if let Some(prev_node) = self.slots[prev_idx].node.as_mut() {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_idx) = next {
            if let Some(next_node) = self.slots[next_idx].node.as_mut() {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = self.slots[index].node.as_mut() {
            node.prev = None;
            node.next = None;
            node.linked = false;
        }
        self.len -= 1;
    }

    fn link(&mut self, index: usize, position: Position) {
        let (prev, next) = match position {
            Position::First => (None, self.head),
            Position::Last => (self.tail, None),
        };
        if let Some(node) = self.slots[index].node.as_mut() {
            node.prev = prev;
            node.next = next;
            node.linked = true;
        } else {
            return;
        }

        match position {
            Position::First => {
                if let Some(head_idx) = self.head {
                    if let Some(head_node) = self.slots[head_idx].node.as_mut() {
                        head_node.prev = Some(index);
                    }
                } else {
                    self.tail = Some(index);
                }
                self.head = Some(index);
            }
            Position::Last => {
                if let Some(tail_idx) = self.tail {
                    if let Some(tail_node) = self.slots[tail_idx].node.as_mut() {
                        tail_node.next = Some(index);
                    }
                } else {
                    self.head = Some(index);
                }
                self.tail = Some(index);
            }
        }
        self.len += 1;
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for data in iter {
            self.push_back(data);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.slots[self.front?].node.as_ref()?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.slots[self.back?].node.as_ref()?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.data)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks the raw links and checks symmetry, boundaries and length.
    fn assert_links<T>(list: &LinkedList<T>) {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = list.head;
        while let Some(index) = cursor {
            let node = list.slots[index].node.as_ref().expect("linked slot");
            assert!(node.linked);
            assert_eq!(node.prev, prev);
            prev = Some(index);
            cursor = node.next;
            count += 1;
        }
        assert_eq!(list.tail, prev);
        assert_eq!(count, list.len());
    }

    fn collect(list: &LinkedList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_add_at_both_ends() {
        let mut list = LinkedList::new();
        list.add(2, Position::Last);
        list.add(1, Position::First);
        list.add(3, Position::default());

        assert_eq!(collect(&list), vec![1, 2, 3]);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));
        assert_links(&list);
    }

    #[test]
    fn test_remove_node_restitches_neighbours() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        let b = list.push_back(2);
        let c = list.push_back(3);

        list.remove_node(b).unwrap();
        assert_eq!(collect(&list), vec![1, 3]);
        assert_eq!(list.next_of(a), Some(c));
        assert_eq!(list.prev_of(c), Some(a));
        assert_links(&list);

        list.remove_node(a).unwrap();
        list.remove_node(c).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.first(), None);
        assert_eq!(list.last(), None);
        assert_links(&list);

        // detached nodes keep their data and handle
        assert_eq!(list.get(b), Some(&2));
        assert!(!list.is_linked(b));
    }

    #[test]
    fn test_add_node_rejects_linked_node() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        assert_eq!(list.add_node(a, Position::First), Err(Error::NodeLinked(a)));

        let detached = list.create_node(0);
        assert_eq!(list.len(), 1);
        assert_eq!(list.add_node(detached, Position::First), Ok(detached));
        assert_eq!(collect(&list), vec![0, 1]);
        assert_links(&list);
    }

    #[test]
    fn test_remove_node_rejects_detached_and_stale() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        list.remove_node(a).unwrap();
        assert_eq!(list.remove_node(a), Err(Error::NodeDetached(a)));

        assert_eq!(list.take(a), Ok(1));
        assert_eq!(list.remove_node(a), Err(Error::UnknownNode(a)));
        assert_eq!(list.add_node(a, Position::Last), Err(Error::UnknownNode(a)));
        assert!(list.remove_node(a).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        assert_eq!(list.take(a), Ok(1));
        let b = list.push_back(2);
        assert_ne!(a, b);
        assert_eq!(list.get(a), None);
        assert_eq!(list.get(b), Some(&2));
    }

    #[test]
    fn test_remove_first_and_last() {
        let mut list: LinkedList<i32> = (1..=3).collect();
        assert_eq!(list.remove_first(), Some(1));
        assert_eq!(list.remove_last(), Some(3));
        assert_eq!(list.remove_first(), Some(2));
        assert_eq!(list.remove_first(), None);
        assert_eq!(list.remove_last(), None);
        assert_links(&list);
    }

    #[test]
    fn test_move_to_keeps_identity() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        list.push_back(2);
        list.push_back(3);

        list.move_to(a, Position::Last).unwrap();
        assert_eq!(collect(&list), vec![2, 3, 1]);
        assert_eq!(list.last(), Some(a));

        list.move_to(a, Position::Last).unwrap();
        list.move_to(a, Position::First).unwrap();
        assert_eq!(collect(&list), vec![1, 2, 3]);
        assert_eq!(list.len(), 3);
        assert_links(&list);
    }

    #[test]
    fn test_find() {
        let mut list = LinkedList::new();
        list.push_back("a");
        let b = list.push_back("b");
        list.push_back("b");

        assert_eq!(list.find(&"b"), Some(b));
        assert_eq!(list.find(&"z"), None);
        assert_eq!(list.find_by(|s| s.eq_ignore_ascii_case("A")), list.first());
    }

    #[test]
    fn test_find_none_matches_none_node() {
        // None is an ordinary value here, not a "nothing found" marker
        let mut list: LinkedList<Option<i32>> = LinkedList::new();
        list.push_back(Some(1));
        let empty = list.push_back(None);
        list.push_back(None);

        assert_eq!(list.find(&None), Some(empty));
        assert_eq!(list.get(empty), Some(&None));
        assert_eq!(list.find(&Some(2)), None);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut a = LinkedList::new();
        let mut b = LinkedList::new();
        let own = a.push_back(1);
        let foreign = b.push_back(2);
        let foreign_detached = b.create_node(3);

        assert_eq!(a.remove_node(foreign), Err(Error::UnknownNode(foreign)));
        assert_eq!(a.move_to(foreign, Position::First), Err(Error::UnknownNode(foreign)));
        assert_eq!(a.take(foreign), Err(Error::UnknownNode(foreign)));
        assert_eq!(
            a.add_node(foreign_detached, Position::Last),
            Err(Error::UnknownNode(foreign_detached))
        );
        assert_eq!(a.get(foreign), None);
        assert!(!a.is_linked(foreign));

        assert_eq!(collect(&a), vec![1]);
        assert_eq!(a.get(own), Some(&1));
        assert_eq!(collect(&b), vec![2]);
        assert!(b.is_linked(foreign));
        assert_links(&a);
        assert_links(&b);
    }

    #[test]
    fn test_exhausted_slot_is_retired() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        list.slots[a.index].generation = u32::MAX;
        let a = list.first().expect("head");

        assert_eq!(list.take(a), Ok(1));
        assert!(list.free_list.is_empty());
        let b = list.push_back(2);
        assert_ne!(a.index, b.index);
        assert_eq!(list.get(a), None);
        assert_eq!(list.get(b), Some(&2));

        list.slots[b.index].generation = u32::MAX;
        list.clear();
        assert!(list.free_list.is_empty());
        assert_eq!(list.push_back(3).index, 2);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        let detached = list.create_node(9);
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.get(a), None);
        assert_eq!(list.take(detached), Err(Error::UnknownNode(detached)));
        list.push_back(5);
        assert_eq!(collect(&list), vec![5]);
        assert_links(&list);
    }

    #[test]
    fn test_iter_meets_in_the_middle() {
        let list: LinkedList<i32> = (1..=4).collect();
        let mut iter = list.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
}
