//! Recency List Module
//!
//! Arena-backed doubly-linked list ordering entries by last use.

use generational_arena::{Arena, Index};

use crate::cache::CacheEntry;

/// Stable handle to a node in the recency list.
pub type Handle = Index;

#[derive(Debug)]
struct Node {
    key: String,
    entry: CacheEntry,
    prev: Option<Handle>,
    next: Option<Handle>,
}

// == Recency List ==
/// Orders cache entries by access time.
///
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Nodes live in an arena and link to each other by handle, so moving or
/// removing any node is O(1) and no node is ever aliased mutably. Handles are
/// generational: using one after its node was removed panics instead of
/// reaching a recycled slot.
#[derive(Debug)]
pub struct RecencyList {
    nodes: Arena<Node>,
    head: Option<Handle>,
    tail: Option<Handle>,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            head: None,
            tail: None,
        }
    }

    // == Push Front ==
    /// Inserts a new node as the most recently used one.
    pub fn push_front(&mut self, key: String, entry: CacheEntry) -> Handle {
        let handle = self.nodes.insert(Node {
            key,
            entry,
            prev: None,
            next: None,
        });
        self.link_front(handle);
        handle
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    pub fn move_to_front(&mut self, handle: Handle) {
        if self.head == Some(handle) {
            return;
        }
        self.unlink(handle);
        self.link_front(handle);
    }

    // == Remove ==
    /// Detaches a node and frees its slot, returning its key and entry.
    pub fn remove(&mut self, handle: Handle) -> (String, CacheEntry) {
        self.unlink(handle);
        match self.nodes.remove(handle) {
            Some(node) => (node.key, node.entry),
            None => panic!("recency list handle {:?} has no node", handle),
        }
    }

    // == Pop Back ==
    /// Removes and returns the least recently used node.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<(String, CacheEntry)> {
        let tail = self.tail?;
        Some(self.remove(tail))
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&str> {
        self.tail.map(|handle| self.nodes[handle].key.as_str())
    }

    /// Borrows the entry behind a handle.
    pub fn entry(&self, handle: Handle) -> &CacheEntry {
        &self.nodes[handle].entry
    }

    /// Mutably borrows the entry behind a handle.
    pub fn entry_mut(&mut self, handle: Handle) -> &mut CacheEntry {
        &mut self.nodes[handle].entry
    }

    /// Visits every node in slot order, not recency order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &str, &CacheEntry)> {
        self.nodes
            .iter()
            .map(|(handle, node)| (handle, node.key.as_str(), &node.entry))
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        let mut current = self.head;
        while let Some(handle) = current {
            let node = &self.nodes[handle];
            keys.push(node.key.as_str());
            current = node.next;
        }
        keys
    }

    // == Clear ==
    /// Drops every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    // == Length ==
    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Detaches a node from its neighbours. Covers the sole-node, head, tail
    // and interior cases through the head/tail fallbacks.
    fn unlink(&mut self, handle: Handle) {
        let (prev, next) = {
            let node = &mut self.nodes[handle];
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }
    }

    // Splices a detached node in before the current head.
    fn link_front(&mut self, handle: Handle) {
        let old_head = self.head;
        {
            let node = &mut self.nodes[handle];
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(old) => self.nodes[old].prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn entry(value: &str) -> CacheEntry {
        CacheEntry::new(
            Arc::from(value.as_bytes()),
            Duration::from_secs(60),
            Instant::now(),
        )
    }

    fn push(list: &mut RecencyList, key: &str) -> Handle {
        list.push_front(key.to_string(), entry(key))
    }

    #[test]
    fn test_list_new() {
        let list = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.peek_oldest(), None);
        assert!(list.keys().is_empty());
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = RecencyList::new();

        push(&mut list, "key1");
        push(&mut list, "key2");
        push(&mut list, "key3");

        assert_eq!(list.len(), 3);
        assert_eq!(list.keys(), vec!["key3", "key2", "key1"]);
        // key1 is oldest (added first)
        assert_eq!(list.peek_oldest(), Some("key1"));
    }

    #[test]
    fn test_move_to_front_from_tail() {
        let mut list = RecencyList::new();

        let key1 = push(&mut list, "key1");
        push(&mut list, "key2");
        push(&mut list, "key3");

        list.move_to_front(key1);

        assert_eq!(list.keys(), vec!["key1", "key3", "key2"]);
        assert_eq!(list.peek_oldest(), Some("key2"));
    }

    #[test]
    fn test_move_to_front_from_middle() {
        let mut list = RecencyList::new();

        push(&mut list, "a");
        let b = push(&mut list, "b");
        push(&mut list, "c");

        list.move_to_front(b);

        assert_eq!(list.keys(), vec!["b", "c", "a"]);
        assert_eq!(list.peek_oldest(), Some("a"));
    }

    #[test]
    fn test_move_to_front_head_is_noop() {
        let mut list = RecencyList::new();

        push(&mut list, "a");
        let b = push(&mut list, "b");

        list.move_to_front(b);
        list.move_to_front(b);

        assert_eq!(list.keys(), vec!["b", "a"]);
    }

    #[test]
    fn test_move_to_front_sole_node() {
        let mut list = RecencyList::new();

        let only = push(&mut list, "only");
        list.move_to_front(only);

        assert_eq!(list.keys(), vec!["only"]);
        assert_eq!(list.peek_oldest(), Some("only"));
    }

    #[test]
    fn test_pop_back_returns_oldest() {
        let mut list = RecencyList::new();

        push(&mut list, "key1");
        push(&mut list, "key2");
        push(&mut list, "key3");

        let (key, evicted) = list.pop_back().unwrap();
        assert_eq!(key, "key1");
        assert_eq!(&*evicted.value, b"key1");
        assert_eq!(list.len(), 2);

        let (key, _) = list.pop_back().unwrap();
        assert_eq!(key, "key2");
        assert_eq!(list.keys(), vec!["key3"]);
    }

    #[test]
    fn test_pop_back_sole_node_empties_list() {
        let mut list = RecencyList::new();
        push(&mut list, "only");

        assert!(list.pop_back().is_some());
        assert!(list.is_empty());
        assert_eq!(list.peek_oldest(), None);

        // The list must still link correctly after draining
        push(&mut list, "again");
        assert_eq!(list.keys(), vec!["again"]);
    }

    #[test]
    fn test_pop_back_empty() {
        let mut list = RecencyList::new();
        assert!(list.pop_back().is_none());
    }

    #[test]
    fn test_remove_head_middle_and_tail() {
        let mut list = RecencyList::new();

        let a = push(&mut list, "a");
        let b = push(&mut list, "b");
        let c = push(&mut list, "c");
        push(&mut list, "d");

        let (key, _) = list.remove(b);
        assert_eq!(key, "b");
        assert_eq!(list.keys(), vec!["d", "c", "a"]);

        list.remove(a);
        assert_eq!(list.keys(), vec!["d", "c"]);
        assert_eq!(list.peek_oldest(), Some("c"));

        let d = list.iter().find(|(_, key, _)| *key == "d").map(|(h, _, _)| h).unwrap();
        list.remove(d);
        assert_eq!(list.keys(), vec!["c"]);

        list.remove(c);
        assert!(list.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_stale_handle_panics() {
        let mut list = RecencyList::new();
        let a = push(&mut list, "a");
        list.remove(a);

        // Same slot gets reused with a new generation
        push(&mut list, "b");
        list.move_to_front(a);
    }

    #[test]
    fn test_entry_mut_updates_in_place() {
        let mut list = RecencyList::new();
        let a = push(&mut list, "a");

        list.entry_mut(a).value = Arc::from(&b"changed"[..]);
        assert_eq!(&*list.entry(a).value, b"changed");
    }

    #[test]
    fn test_clear_resets_list() {
        let mut list = RecencyList::new();
        push(&mut list, "a");
        push(&mut list, "b");

        list.clear();

        assert!(list.is_empty());
        assert!(list.keys().is_empty());
        assert_eq!(list.peek_oldest(), None);

        push(&mut list, "c");
        assert_eq!(list.keys(), vec!["c"]);
    }

    #[test]
    fn test_order_after_multiple_touches() {
        let mut list = RecencyList::new();

        let a = push(&mut list, "a");
        let b = push(&mut list, "b");
        let c = push(&mut list, "c");

        list.move_to_front(a);
        list.move_to_front(c);
        list.move_to_front(b);

        assert_eq!(list.pop_back().map(|(k, _)| k), Some("a".to_string()));
        assert_eq!(list.pop_back().map(|(k, _)| k), Some("c".to_string()));
        assert_eq!(list.pop_back().map(|(k, _)| k), Some("b".to_string()));
    }
}
