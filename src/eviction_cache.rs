//! Capacity-bounded indexed cache frontend.
//!
//! [`EvictionCache`] pairs a [`ThreadSafeStore`] with a pluggable
//! [`EvictionPolicy`]. Every mutation runs in two phases under one operation
//! lock: the policy decides first (possibly naming a victim), then the store
//! is updated to match.
//!
//! ```text
//!   EvictionCache<K, V, I>
//!   ├── op_lock: Mutex<()>      serializes policy+store sequences
//!   ├── policy: Box<dyn EvictionPolicy<K>>
//!   ├── store: ThreadSafeStore<K, V, I>
//!   └── key_fn: KeyFn<K, V>
//! ```
//!
//! Reads that hit count as recency/frequency touches. At steady state the
//! store never holds more than the policy's capacity.
//!
//! ## Example Usage
//!
//! ```
//! use indexcache::eviction_cache::EvictionCache;
//! use indexcache::policy::LruPolicy;
//! use indexcache::traits::ObjectStore;
//!
//! let cache: EvictionCache<u32, (u32, &'static str)> = EvictionCache::new(
//!     Box::new(|v: &(u32, &'static str)| Ok(v.0)),
//!     Box::new(LruPolicy::new(2)),
//! );
//!
//! cache.add((1, "one")).unwrap();
//! cache.add((2, "two")).unwrap();
//! cache.add((3, "three")).unwrap();
//!
//! assert_eq!(cache.get_by_key(&1), None); // least recently used, evicted
//! assert_eq!(cache.len(), 2);
//! ```

use std::hash::Hash;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::CacheError;
use crate::policy::EvictionPolicy;
use crate::store::index::{IndexFn, Indexers};
use crate::store::thread_safe::{LessFn, ThreadSafeStore};
use crate::traits::{IndexedStore, KeyFn, ObjectStore};

/// Indexed cache bounded by an eviction policy.
pub struct EvictionCache<K, V, I = K> {
    store: ThreadSafeStore<K, V, I>,
    key_fn: KeyFn<K, V>,
    policy: Box<dyn EvictionPolicy<K>>,
    // Both the policy and the store synchronize internally, but a mutation is
    // a policy step followed by a store step. This lock keeps the pair atomic
    // with respect to other mutations.
    op_lock: Mutex<()>,
}

impl<K, V, I> EvictionCache<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    /// Creates an empty cache governed by `policy`, with no indexes.
    pub fn new(key_fn: KeyFn<K, V>, policy: Box<dyn EvictionPolicy<K>>) -> Self {
        Self::with_indexers(key_fn, policy, Indexers::default())
    }

    /// Creates an empty cache governed by `policy` with the given index
    /// registrations.
    pub fn with_indexers(
        key_fn: KeyFn<K, V>,
        policy: Box<dyn EvictionPolicy<K>>,
        indexers: Indexers<I, V>,
    ) -> Self {
        Self {
            store: ThreadSafeStore::with_indexers(indexers),
            key_fn,
            policy,
            op_lock: Mutex::new(()),
        }
    }

    /// Force-evicts one entry chosen by the policy and returns it.
    ///
    /// Fails with [`CacheError::EmptyEviction`] when nothing is cached.
    pub fn evict(&self) -> Result<(K, V), CacheError> {
        let _op = self.op_lock.lock();
        let victim = self.policy.evict().ok_or(CacheError::EmptyEviction)?;
        let obj = self.store.get(&victim);
        self.store.delete(&victim);
        trace!(key = ?victim, "forced eviction");
        // The policy only tracks keys the store holds, so the lookup hits.
        match obj {
            Some(obj) => Ok((victim, obj)),
            None => Err(CacheError::EmptyEviction),
        }
    }

    fn key_of(&self, obj: &V) -> Result<K, CacheError> {
        (self.key_fn)(obj).map_err(|source| CacheError::key_derivation(obj, source))
    }

    /// Admits `key` to the policy and removes any victim it names from the
    /// store. Caller holds the operation lock.
    fn admit(&self, key: &K) {
        if let Some(victim) = self.policy.put(key.clone()) {
            trace!(key = ?victim, "capacity eviction");
            self.store.delete(&victim);
        }
    }
}

impl<K, V, I> ObjectStore<K, V> for EvictionCache<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    fn add(&self, obj: V) -> Result<(), CacheError> {
        let key = self.key_of(&obj)?;
        let _op = self.op_lock.lock();
        self.admit(&key);
        self.store.add(key, obj);
        Ok(())
    }

    fn update(&self, obj: V) -> Result<(), CacheError> {
        let key = self.key_of(&obj)?;
        let _op = self.op_lock.lock();
        self.admit(&key);
        self.store.update(key, obj);
        Ok(())
    }

    fn delete(&self, obj: &V) -> Result<(), CacheError> {
        let key = self.key_of(obj)?;
        let _op = self.op_lock.lock();
        self.policy.delete(&key);
        self.store.delete(&key);
        Ok(())
    }

    fn get(&self, obj: &V) -> Result<Option<V>, CacheError> {
        let key = self.key_of(obj)?;
        Ok(self.get_by_key(&key))
    }

    /// A hit counts as a policy touch; a miss leaves the policy untouched.
    fn get_by_key(&self, key: &K) -> Option<V> {
        let _op = self.op_lock.lock();
        let obj = self.store.get(key)?;
        self.policy.put(key.clone());
        Some(obj)
    }

    fn list(&self) -> Vec<V> {
        self.store.list()
    }

    fn list_keys(&self) -> Vec<K> {
        self.store.list_keys()
    }

    /// Replaces the contents and rebuilds the policy state from scratch.
    ///
    /// If `items` exceeds capacity, the policy evicts as keys are re-admitted
    /// and the final contents respect the bound.
    fn replace(&self, items: Vec<V>) -> Result<(), CacheError> {
        let mut keyed = Vec::with_capacity(items.len());
        for obj in items {
            let key = self.key_of(&obj)?;
            keyed.push((key, obj));
        }
        let _op = self.op_lock.lock();
        self.policy.reset();
        let keys: Vec<K> = keyed.iter().map(|(k, _)| k.clone()).collect();
        self.store.replace(keyed);
        for key in &keys {
            self.admit(key);
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<K, V, I> IndexedStore<K, V, I> for EvictionCache<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    fn index(&self, index_name: &str, obj: &V, less: LessFn<'_, K>) -> Result<Vec<V>, CacheError> {
        self.store.index(index_name, obj, less)
    }

    /// An index hit touches the policy once per returned key.
    fn index_keys(
        &self,
        index_name: &str,
        indexed_value: &I,
        less: LessFn<'_, K>,
    ) -> Result<Vec<K>, CacheError> {
        let _op = self.op_lock.lock();
        let keys = self.store.index_keys(index_name, indexed_value, less)?;
        for key in &keys {
            self.policy.put(key.clone());
        }
        Ok(keys)
    }

    fn by_index(
        &self,
        index_name: &str,
        indexed_value: &I,
        less: LessFn<'_, K>,
    ) -> Result<Vec<V>, CacheError> {
        self.store.by_index(index_name, indexed_value, less)
    }

    fn add_indexer(&self, index_name: &str, index_fn: IndexFn<I, V>) -> Result<(), CacheError> {
        self.store.add_indexer(index_name, index_fn)
    }

    fn add_indexers(&self, indexers: Indexers<I, V>) -> Result<(), CacheError> {
        self.store.add_indexers(indexers)
    }
}
