//! First-In, First-Out eviction policy.
//!
//! Keys are evicted in pure insertion order. A repeat `put` of a tracked key
//! is a no-op: FIFO deliberately ignores accesses, so a key's position is
//! fixed at the moment it enters the queue.
//!
//! ## Architecture
//!
//! ```text
//!   order: KeyList<K>            front = oldest, back = newest
//!   slots: FxHashMap<K, SlotId>  key -> list node, for O(1) delete
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use indexcache::policy::{EvictionPolicy, FifoPolicy};
//!
//! let policy = FifoPolicy::new(2);
//! assert_eq!(policy.put(1), None);
//! assert_eq!(policy.put(2), None);
//!
//! // Capacity reached: the oldest key is evicted for a new one.
//! assert_eq!(policy.put(3), Some(1));
//! assert_eq!(policy.len(), 2);
//! ```

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::{KeyList, SlotId};
use crate::policy::EvictionPolicy;

#[derive(Debug)]
struct FifoInner<K> {
    order: KeyList<K>,
    slots: FxHashMap<K, SlotId>,
}

/// FIFO eviction policy over keys.
#[derive(Debug)]
pub struct FifoPolicy<K> {
    capacity: usize,
    inner: Mutex<FifoInner<K>>,
}

impl<K> FifoPolicy<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a FIFO policy with a fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(FifoInner {
                order: KeyList::with_capacity(capacity),
                slots: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            }),
        }
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn evict_locked<K: Eq + Hash + Clone>(inner: &mut FifoInner<K>) -> Option<K> {
    let key = inner.order.pop_front()?;
    inner.slots.remove(&key);
    Some(key)
}

impl<K> EvictionPolicy<K> for FifoPolicy<K>
where
    K: Eq + Hash + Clone + Send,
{
    fn put(&self, key: K) -> Option<K> {
        let mut inner = self.inner.lock();
        if inner.slots.contains_key(&key) {
            // Insertion order is fixed; accesses don't reorder.
            return None;
        }
        let evicted = if inner.order.len() >= self.capacity {
            evict_locked(&mut inner)
        } else {
            None
        };
        let id = inner.order.push_back(key.clone());
        inner.slots.insert(key, id);
        evicted
    }

    fn delete(&self, key: &K) {
        let mut inner = self.inner.lock();
        if let Some(id) = inner.slots.remove(key) {
            inner.order.remove(id);
        }
    }

    fn evict(&self) -> Option<K> {
        evict_locked(&mut self.inner.lock())
    }

    fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.order.clear();
        inner.slots.clear();
    }

    fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_in_insertion_order() {
        let policy = FifoPolicy::new(2);
        assert_eq!(policy.put(1), None);
        assert_eq!(policy.put(2), None);
        assert_eq!(policy.put(3), Some(1));
        assert_eq!(policy.put(4), Some(2));
        assert_eq!(policy.len(), 2);
    }

    #[test]
    fn repeat_put_is_a_noop() {
        let policy = FifoPolicy::new(2);
        policy.put(1);
        policy.put(2);
        // Re-putting key 1 must not move it off the front.
        assert_eq!(policy.put(1), None);
        assert_eq!(policy.put(3), Some(1));
    }

    #[test]
    fn repeat_put_at_capacity_never_evicts() {
        let policy = FifoPolicy::new(2);
        policy.put(1);
        policy.put(2);
        assert_eq!(policy.put(2), None);
        assert_eq!(policy.len(), 2);
    }

    #[test]
    fn explicit_evict_pops_oldest() {
        let policy = FifoPolicy::new(3);
        policy.put("a");
        policy.put("b");
        assert_eq!(policy.evict(), Some("a"));
        assert_eq!(policy.evict(), Some("b"));
        assert_eq!(policy.evict(), None);
    }

    #[test]
    fn delete_removes_from_the_middle() {
        let policy = FifoPolicy::new(3);
        policy.put(1);
        policy.put(2);
        policy.put(3);
        policy.delete(&2);
        assert_eq!(policy.len(), 2);
        assert_eq!(policy.evict(), Some(1));
        assert_eq!(policy.evict(), Some(3));
    }

    #[test]
    fn delete_of_unknown_key_is_a_noop() {
        let policy = FifoPolicy::new(2);
        policy.put(1);
        policy.delete(&99);
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn reset_clears_without_evicting() {
        let policy = FifoPolicy::new(2);
        policy.put(1);
        policy.put(2);
        policy.reset();
        assert!(policy.is_empty());
        // Fresh inserts start over.
        assert_eq!(policy.put(3), None);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let policy = FifoPolicy::new(4);
        for i in 0..100 {
            policy.put(i);
            assert!(policy.len() <= 4);
        }
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;

        let policy = Arc::new(FifoPolicy::new(8));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let policy = Arc::clone(&policy);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        policy.put(t * 1000 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(policy.len() <= 8);
    }
}
