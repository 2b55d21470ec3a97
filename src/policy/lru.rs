//! Least-Recently-Used eviction policy.
//!
//! Same backbone as [`FifoPolicy`](crate::policy::FifoPolicy): an
//! arena-backed key list plus a key→node map, but a repeat `put` promotes
//! the key to the most-recently-used end of the list instead of being a
//! no-op. Eviction always removes the least-recently-used (front) key.
//!
//! A repeat `put` never evicts: only a genuinely new key at capacity does.
//!
//! ## Example Usage
//!
//! ```
//! use indexcache::policy::{EvictionPolicy, LruPolicy};
//!
//! let policy = LruPolicy::new(2);
//! policy.put(1);
//! policy.put(2);
//!
//! // Touch key 1, making key 2 the LRU.
//! policy.put(1);
//!
//! assert_eq!(policy.put(3), Some(2));
//! ```

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::{KeyList, SlotId};
use crate::policy::EvictionPolicy;

#[derive(Debug)]
struct LruInner<K> {
    order: KeyList<K>,
    slots: FxHashMap<K, SlotId>,
}

/// LRU eviction policy over keys.
#[derive(Debug)]
pub struct LruPolicy<K> {
    capacity: usize,
    inner: Mutex<LruInner<K>>,
}

impl<K> LruPolicy<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU policy with a fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(LruInner {
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

fn evict_locked<K: Eq + Hash + Clone>(inner: &mut LruInner<K>) -> Option<K> {
    let key = inner.order.pop_front()?;
    inner.slots.remove(&key);
    Some(key)
}

impl<K> EvictionPolicy<K> for LruPolicy<K>
where
    K: Eq + Hash + Clone + Send,
{
    fn put(&self, key: K) -> Option<K> {
        let mut inner = self.inner.lock();
        if let Some(&id) = inner.slots.get(&key) {
            // Touch: promote to the MRU end, no eviction.
            inner.order.move_to_back(id);
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
