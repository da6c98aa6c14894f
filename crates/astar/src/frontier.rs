//! Open-set priority structure: an indexed binary min-heap.
//!
//! Entries are ordered by `(score, insertion sequence)`, so equal scores come
//! out in insertion order. A `HashMap` from identity to heap position gives
//! O(1) lookup and supports decrease-key via [`Frontier::update_in_place`].

use std::collections::HashMap;
use std::hash::Hash;

use ordered_float::OrderedFloat;

/// Something that can sit on the frontier.
pub trait FrontierItem {
    /// Identity used for lookup; at most one entry per key.
    type Key: Eq + Hash + Clone;

    fn key(&self) -> &Self::Key;

    /// Ordering key, lower is extracted first.
    fn score(&self) -> OrderedFloat<f64>;
}

#[derive(Debug)]
struct HeapEntry<T> {
    seq: u64,
    item: T,
}

impl<T: FrontierItem> HeapEntry<T> {
    fn priority(&self) -> (OrderedFloat<f64>, u64) {
        (self.item.score(), self.seq)
    }
}

/// Best-first frontier with identity index.
///
/// Maintains:
/// - a binary min-heap of entries keyed by `(score, seq)`
/// - a map from identity to the entry's current heap slot
/// - a high-water mark of the heap size
#[derive(Debug)]
pub struct Frontier<T: FrontierItem> {
    heap: Vec<HeapEntry<T>>,
    positions: HashMap<T::Key, usize>,
    next_seq: u64,
    high_water: usize,
}

impl<T: FrontierItem> Frontier<T> {
    /// Create a new empty frontier.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            positions: HashMap::new(),
            next_seq: 0,
            high_water: 0,
        }
    }

    /// Add an item at its sorted position.
    ///
    /// Callers are expected to check [`Frontier::lookup`] first. If the key
    /// is already present anyway, the old entry is displaced and returned so
    /// the index never holds two entries for one identity.
    pub fn insert(&mut self, item: T) -> Option<T> {
        let displaced = self.remove(item.key());
        let seq = self.next_seq;
        self.next_seq += 1;

        let pos = self.heap.len();
        self.positions.insert(item.key().clone(), pos);
        self.heap.push(HeapEntry { seq, item });
        self.sift_up(pos);

        self.high_water = self.high_water.max(self.heap.len());
        displaced
    }

    /// Remove and return the lowest-score item (earliest inserted on ties).
    pub fn extract_min(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap_entries(0, last);
        let entry = self.heap.pop()?;
        self.positions.remove(entry.item.key());
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(entry.item)
    }

    /// The current item for `key`, if it is on the frontier.
    pub fn lookup(&self, key: &T::Key) -> Option<&T> {
        self.positions.get(key).map(|&pos| &self.heap[pos].item)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.positions.contains_key(key)
    }

    /// Mutate the item for `key` and restore heap order.
    ///
    /// The closure must not change the item's key. The entry keeps its
    /// original insertion sequence for tie-breaking. Returns `false` if `key`
    /// is not on the frontier.
    pub fn update_in_place<F>(&mut self, key: &T::Key, update: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let Some(&pos) = self.positions.get(key) else {
            return false;
        };
        update(&mut self.heap[pos].item);
        debug_assert!(self.heap[pos].item.key() == key, "update_in_place changed the key");
        let pos = self.sift_up(pos);
        self.sift_down(pos);
        true
    }

    /// Remove the item for `key`, wherever it sits in the heap.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        let pos = *self.positions.get(key)?;
        let last = self.heap.len() - 1;
        self.swap_entries(pos, last);
        let entry = self.heap.pop()?;
        self.positions.remove(entry.item.key());
        if pos < self.heap.len() {
            let pos = self.sift_up(pos);
            self.sift_down(pos);
        }
        Some(entry.item)
    }

    /// Current frontier size.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// High-water mark of frontier size.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Iterate items in heap (not priority) order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.heap.iter().map(|e| &e.item)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.heap[a].priority() < self.heap[b].priority()
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        if let Some(p) = self.positions.get_mut(self.heap[a].item.key()) {
            *p = a;
        }
        if let Some(p) = self.positions.get_mut(self.heap[b].item.key()) {
            *p = b;
        }
    }

    /// Returns the entry's final position.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap_entries(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap_entries(pos, smallest);
            pos = smallest;
        }
    }
}

impl<T: FrontierItem> Default for Frontier<T> {
    fn default() -> Self {
        Self::new()
    }
}
