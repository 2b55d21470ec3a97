//! Binary min-heap over per-key frequency counters.
//!
//! Backbone of the LFU eviction policy. Unlike `std::collections::BinaryHeap`,
//! this heap supports in-place updates: a key→position map is maintained
//! alongside the heap vector, so incrementing a key's frequency or removing an
//! arbitrary key is an O(log n) sift instead of a rebuild or a lazy stale
//! entry.
//!
//! ## Layout
//!
//! ```text
//!   heap: Vec<Entry { key, freq }>     sift-ordered, heap[0] = min frequency
//!   pos:  FxHashMap<K, usize>          key -> current heap index
//! ```
//!
//! Every swap inside the heap updates `pos`, mirroring the index fix-up a
//! `container/heap`-style implementation performs.
//!
//! ## Operations
//!
//! | Operation   | Complexity | Notes                                  |
//! |-------------|------------|----------------------------------------|
//! | `push`      | O(log n)   | New key enters with frequency 1        |
//! | `increment` | O(log n)   | Sift down, frequency only grows        |
//! | `remove`    | O(log n)   | Arbitrary key via position lookup      |
//! | `pop_min`   | O(log n)   | Removes the minimum-frequency key      |
//!
//! Ties among equal frequencies are broken by heap order, which depends on
//! insertion history and is not otherwise specified.

use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Debug)]
struct Entry<K> {
    key: K,
    freq: u64,
}

/// Min-heap of `(frequency, key)` entries with O(log n) arbitrary removal.
#[derive(Debug)]
pub struct FreqHeap<K> {
    heap: Vec<Entry<K>>,
    pos: FxHashMap<K, usize>,
}

impl<K> FreqHeap<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            pos: FxHashMap::default(),
        }
    }

    /// Creates an empty heap with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            pos: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` if the key is tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.pos.contains_key(key)
    }

    /// Returns the current frequency of a key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.pos.get(key).map(|&idx| self.heap[idx].freq)
    }

    /// Inserts a new key with frequency 1.
    ///
    /// Returns `false` (and leaves the heap unchanged) if the key is already
    /// tracked; use [`increment`](Self::increment) for repeat accesses.
    pub fn push(&mut self, key: K) -> bool {
        if self.pos.contains_key(&key) {
            return false;
        }
        let idx = self.heap.len();
        self.pos.insert(key.clone(), idx);
        self.heap.push(Entry { key, freq: 1 });
        self.sift_up(idx);
        true
    }

    /// Increments a key's frequency, restoring heap order.
    ///
    /// Returns the new frequency, or `None` if the key is not tracked.
    pub fn increment(&mut self, key: &K) -> Option<u64> {
        let idx = *self.pos.get(key)?;
        self.heap[idx].freq += 1;
        let freq = self.heap[idx].freq;
        // Frequency only grows, so the entry can only move away from the root.
        self.sift_down(idx);
        Some(freq)
    }

    /// Removes an arbitrary key via its heap position.
    ///
    /// Returns `true` if the key was tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        let idx = match self.pos.remove(key) {
            Some(idx) => idx,
            None => return false,
        };
        let last = self.heap.len() - 1;
        if idx != last {
            self.heap.swap(idx, last);
            self.pos.insert(self.heap[idx].key.clone(), idx);
        }
        self.heap.pop();
        if idx < self.heap.len() {
            // The swapped-in entry may violate order in either direction.
            self.sift_up(idx);
            self.sift_down(idx);
        }
        true
    }

    /// Removes and returns the minimum-frequency key.
    pub fn pop_min(&mut self) -> Option<K> {
        let key = self.heap.first()?.key.clone();
        self.remove(&key);
        Some(key)
    }

    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.pos.clear();
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].freq >= self.heap[parent].freq {
                break;
            }
            self.swap_entries(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;
            if left < len && self.heap[left].freq < self.heap[smallest].freq {
                smallest = left;
            }
            if right < len && self.heap[right].freq < self.heap[smallest].freq {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap_entries(idx, smallest);
            idx = smallest;
        }
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.pos.insert(self.heap[a].key.clone(), a);
        self.pos.insert(self.heap[b].key.clone(), b);
    }
}

impl<K: Eq + Hash + Clone> Default for FreqHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_starts_at_frequency_one() {
        let mut heap = FreqHeap::new();
        assert!(heap.push("a"));
        assert!(!heap.push("a"));
        assert_eq!(heap.frequency(&"a"), Some(1));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn increment_grows_frequency() {
        let mut heap = FreqHeap::new();
        heap.push("a");
        assert_eq!(heap.increment(&"a"), Some(2));
        assert_eq!(heap.increment(&"a"), Some(3));
        assert_eq!(heap.frequency(&"a"), Some(3));
        assert_eq!(heap.increment(&"missing"), None);
    }

    #[test]
    fn pop_min_returns_least_frequent() {
        let mut heap = FreqHeap::new();
        heap.push("low");
        heap.push("mid");
        heap.push("high");
        heap.increment(&"mid");
        heap.increment(&"high");
        heap.increment(&"high");

        assert_eq!(heap.pop_min(), Some("low"));
        assert_eq!(heap.pop_min(), Some("mid"));
        assert_eq!(heap.pop_min(), Some("high"));
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn remove_arbitrary_key_keeps_order() {
        let mut heap = FreqHeap::new();
        for key in ["a", "b", "c", "d", "e"] {
            heap.push(key);
        }
        for _ in 0..3 {
            heap.increment(&"a");
        }
        heap.increment(&"b");

        assert!(heap.remove(&"c"));
        assert!(!heap.remove(&"c"));
        assert!(!heap.contains(&"c"));
        assert_eq!(heap.len(), 4);

        // Remaining order: d/e (freq 1) before b (2) before a (4).
        let first = heap.pop_min().unwrap();
        let second = heap.pop_min().unwrap();
        assert!(matches!(first, "d" | "e"));
        assert!(matches!(second, "d" | "e"));
        assert_ne!(first, second);
        assert_eq!(heap.pop_min(), Some("b"));
        assert_eq!(heap.pop_min(), Some("a"));
    }

    #[test]
    fn remove_last_entry() {
        let mut heap = FreqHeap::new();
        heap.push(1);
        assert!(heap.remove(&1));
        assert!(heap.is_empty());
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn positions_stay_consistent_under_churn() {
        let mut heap = FreqHeap::new();
        for i in 0..50 {
            heap.push(i);
        }
        for i in (0..50).step_by(3) {
            for _ in 0..i {
                heap.increment(&i);
            }
        }
        for i in (0..50).step_by(7) {
            heap.remove(&i);
        }

        // Every tracked key must report a position that maps back to itself.
        for i in 0..50 {
            if let Some(freq) = heap.frequency(&i) {
                assert!(freq >= 1);
            }
        }

        // Draining yields monotonically non-decreasing frequencies.
        let mut last = 0;
        while let Some(entry) = heap.heap.first() {
            let freq = entry.freq;
            assert!(freq >= last);
            last = freq;
            heap.pop_min();
        }
    }

    #[test]
    fn clear_resets_state() {
        let mut heap = FreqHeap::new();
        heap.push("a");
        heap.push("b");
        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.contains(&"a"));
        assert!(heap.push("a"));
    }
}
