//! Ordered dictionary: string keys mapped to nodes of a [`LinkedList`].
//!
//! Lookups go through the map, order lives in the list. Relocating an entry
//! moves its node in place, so the handle stored for a key never changes.

use std::collections::HashMap;
use std::fmt;

use crate::linked_list::{LinkedList, NodeId, Position};

struct Entry<V> {
    key: String,
    value: V,
}

pub struct ListDictionary<V> {
    /// Map key -> node handle
    dictionary: HashMap<String, NodeId>,
    linked_list: LinkedList<Entry<V>>,
}

impl<V> ListDictionary<V> {
    pub fn new() -> Self {
        Self {
            dictionary: HashMap::new(),
            linked_list: LinkedList::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dictionary: HashMap::with_capacity(capacity),
            linked_list: LinkedList::with_capacity(capacity),
        }
    }

    /// Insert `value` under `key` at `position`.
    ///
    /// Returns `false` without touching the existing entry (or its position)
    /// when `key` is already present.
    pub fn add(&mut self, key: impl Into<String>, value: V, position: Position) -> bool {
        let key = key.into();
        if self.dictionary.contains_key(&key) {
            return false;
        }
        let id = self.linked_list.add(
            Entry {
                key: key.clone(),
                value,
            },
            position,
        );
        self.dictionary.insert(key, id);
        true
    }

    /// Look up `key` without changing the order.
    pub fn get(&self, key: &str) -> Option<&V> {
        let id = *self.dictionary.get(key)?;
        self.linked_list.get(id).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let id = *self.dictionary.get(key)?;
        self.linked_list.get_mut(id).map(|entry| &mut entry.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.dictionary.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let id = self.dictionary.remove(key)?;
        self.linked_list.take(id).ok().map(|entry| entry.value)
    }

    pub fn first(&self) -> Option<&V> {
        self.linked_list.front().map(|entry| &entry.value)
    }

    pub fn last(&self) -> Option<&V> {
        self.linked_list.back().map(|entry| &entry.value)
    }

    pub fn first_entry(&self) -> Option<(&str, &V)> {
        self.linked_list
            .front()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    pub fn last_entry(&self) -> Option<(&str, &V)> {
        self.linked_list
            .back()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    pub fn remove_first(&mut self) -> Option<V> {
        self.remove_first_entry().map(|(_, value)| value)
    }

    pub fn remove_last(&mut self) -> Option<V> {
        self.remove_last_entry().map(|(_, value)| value)
    }

    /// Remove the head entry and return it with its key.
    pub fn remove_first_entry(&mut self) -> Option<(String, V)> {
        let entry = self.linked_list.remove_first()?;
        self.dictionary.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    pub fn remove_last_entry(&mut self) -> Option<(String, V)> {
        let entry = self.linked_list.remove_last()?;
        self.dictionary.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Rotate the head entry to the tail and return its value.
    pub fn move_first_to_end(&mut self) -> Option<&V> {
        let id = self.linked_list.first()?;
        self.relocate(id, Position::Last)
    }

    /// Move the entry for `key` to the tail. O(1)
    pub fn move_to_end(&mut self, key: &str) -> Option<&V> {
        let id = *self.dictionary.get(key)?;
        self.relocate(id, Position::Last)
    }

    pub fn len(&self) -> usize {
        self.linked_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linked_list.is_empty()
    }

    pub fn clear(&mut self) {
        self.dictionary.clear();
        self.linked_list.clear();
    }

    /// Entries from head to tail.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&str, &V)> + ExactSizeIterator + '_ {
        self.linked_list
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.linked_list.iter().map(|entry| entry.key.as_str())
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.linked_list.iter().map(|entry| &entry.value)
    }

    fn relocate(&mut self, id: NodeId, position: Position) -> Option<&V> {
        // handles in the map are always live, so this only fails on a corrupt map
        self.linked_list.move_to(id, position).ok()?;
        self.linked_list.get(id).map(|entry| &entry.value)
    }
}

impl<V> Default for ListDictionary<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for ListDictionary<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
