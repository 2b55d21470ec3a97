//! Unbounded indexed cache frontend.
//!
//! [`Cache`] pairs a [`ThreadSafeStore`] with a key function, so callers
//! hand over whole objects and never compute keys themselves. It grows
//! without bound; for capacity control see
//! [`EvictionCache`](crate::eviction_cache::EvictionCache).
//!
//! ## Example Usage
//!
//! ```
//! use indexcache::cache::Cache;
//! use indexcache::traits::{IndexedStore, ObjectStore};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Pod { name: String, node: String }
//!
//! let cache: Cache<String, Pod, String> =
//!     Cache::new(Box::new(|p: &Pod| Ok(p.name.clone())));
//! cache.add_indexer("node", Box::new(|p: &Pod| Ok(vec![p.node.clone()]))).unwrap();
//!
//! cache.add(Pod { name: "web-1".into(), node: "a".into() }).unwrap();
//! cache.add(Pod { name: "web-2".into(), node: "a".into() }).unwrap();
//!
//! let on_a = cache.by_index("node", &"a".to_string(), None).unwrap();
//! assert_eq!(on_a.len(), 2);
//! ```

use std::hash::Hash;

use crate::error::CacheError;
use crate::store::index::{IndexFn, Indexers};
use crate::store::thread_safe::{LessFn, ThreadSafeStore};
use crate::traits::{IndexedStore, KeyFn, ObjectStore};

/// Thread-safe indexed cache that derives keys from the objects it stores.
pub struct Cache<K, V, I = K> {
    store: ThreadSafeStore<K, V, I>,
    key_fn: KeyFn<K, V>,
}

impl<K, V, I> Cache<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    /// Creates an empty cache with no indexes.
    pub fn new(key_fn: KeyFn<K, V>) -> Self {
        Self {
            store: ThreadSafeStore::new(),
            key_fn,
        }
    }

    /// Creates an empty cache with the given index registrations.
    pub fn with_indexers(key_fn: KeyFn<K, V>, indexers: Indexers<I, V>) -> Self {
        Self {
            store: ThreadSafeStore::with_indexers(indexers),
            key_fn,
        }
    }

    fn key_of(&self, obj: &V) -> Result<K, CacheError> {
        (self.key_fn)(obj).map_err(|source| CacheError::key_derivation(obj, source))
    }
}

impl<K, V, I> ObjectStore<K, V> for Cache<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    fn add(&self, obj: V) -> Result<(), CacheError> {
        let key = self.key_of(&obj)?;
        self.store.add(key, obj);
        Ok(())
    }

    fn update(&self, obj: V) -> Result<(), CacheError> {
        let key = self.key_of(&obj)?;
        self.store.update(key, obj);
        Ok(())
    }

    fn delete(&self, obj: &V) -> Result<(), CacheError> {
        let key = self.key_of(obj)?;
        self.store.delete(&key);
        Ok(())
    }

    fn get(&self, obj: &V) -> Result<Option<V>, CacheError> {
        let key = self.key_of(obj)?;
        Ok(self.store.get(&key))
    }

    fn get_by_key(&self, key: &K) -> Option<V> {
        self.store.get(key)
    }

    fn list(&self) -> Vec<V> {
        self.store.list()
    }

    fn list_keys(&self) -> Vec<K> {
        self.store.list_keys()
    }

    fn replace(&self, items: Vec<V>) -> Result<(), CacheError> {
        let mut keyed = Vec::with_capacity(items.len());
        for obj in items {
            let key = self.key_of(&obj)?;
            keyed.push((key, obj));
        }
        self.store.replace(keyed);
        Ok(())
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<K, V, I> IndexedStore<K, V, I> for Cache<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    fn index(&self, index_name: &str, obj: &V, less: LessFn<'_, K>) -> Result<Vec<V>, CacheError> {
        self.store.index(index_name, obj, less)
    }

    fn index_keys(
        &self,
        index_name: &str,
        indexed_value: &I,
        less: LessFn<'_, K>,
    ) -> Result<Vec<K>, CacheError> {
        self.store.index_keys(index_name, indexed_value, less)
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
