//! Least-Frequently-Used eviction policy.
//!
//! Backed by a sift-based min-heap over per-key frequency counters
//! ([`FreqHeap`](crate::ds::FreqHeap)). A key enters with frequency 1 and
//! every repeat `put` increments its counter; eviction pops the current
//! minimum. Ties among equal frequencies are broken by heap order, which is
//! implementation-defined.
//!
//! All heap maintenance is O(log n); `delete` of an arbitrary key uses the
//! heap's position map rather than a scan.
//!
//! ## Example Usage
//!
//! ```
//! use indexcache::policy::{EvictionPolicy, LfuPolicy};
//!
//! let policy = LfuPolicy::new(2);
//! policy.put(1);
//! policy.put(2);
//! policy.put(2); // frequency 2
//!
//! // Key 1 has the lowest frequency and is evicted for the newcomer.
//! assert_eq!(policy.put(3), Some(1));
//! ```

use std::hash::Hash;

use parking_lot::Mutex;

use crate::ds::FreqHeap;
use crate::policy::EvictionPolicy;

/// LFU eviction policy over keys.
#[derive(Debug)]
pub struct LfuPolicy<K> {
    capacity: usize,
    heap: Mutex<FreqHeap<K>>,
}

impl<K> LfuPolicy<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU policy with a fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: Mutex::new(FreqHeap::with_capacity(capacity)),
        }
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current frequency counter for a key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.heap.lock().frequency(key)
    }
}

impl<K> EvictionPolicy<K> for LfuPolicy<K>
where
    K: Eq + Hash + Clone + Send,
{
    fn put(&self, key: K) -> Option<K> {
        let mut heap = self.heap.lock();
        if heap.increment(&key).is_some() {
            return None;
        }
        let evicted = if heap.len() >= self.capacity {
            heap.pop_min()
        } else {
            None
        };
        heap.push(key);
        evicted
    }

    fn delete(&self, key: &K) {
        self.heap.lock().remove(key);
    }

    fn evict(&self) -> Option<K> {
        self.heap.lock().pop_min()
    }

    fn reset(&self) {
        self.heap.lock().clear();
    }

    fn len(&self) -> usize {
        self.heap.lock().len()
    }
}
