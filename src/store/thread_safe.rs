//! Thread-safe keyed store with secondary indexing.
//!
//! ## Architecture
//!
//! ```text
//!   ThreadSafeStore<K, V, I>
//!   └── RwLock<Inner>
//!       ├── items: FxHashMap<K, V>        the object map
//!       └── index: StoreIndex<K, V, I>    buckets per registered index
//! ```
//!
//! One lock guards both fields jointly: every mutation re-buckets the key in
//! the same critical section that changes the object map, so readers always
//! observe index state consistent with the items. Reads (`get`, `list`,
//! index queries) take the shared lock and run concurrently with each other.
//!
//! Values are returned by clone. For large objects, store `Arc<T>` values so
//! clones are pointer bumps.
//!
//! ## Core Operations
//!
//! | Method            | Lock   | Description                                |
//! |-------------------|--------|--------------------------------------------|
//! | `add` / `update`  | write  | Upsert; re-buckets the key in every index  |
//! | `delete`          | write  | Remove; no-op if absent                    |
//! | `replace`         | write  | Swap all items, rebuild every index        |
//! | `add_indexer(s)`  | write  | Register + back-fill over current items    |
//! | `get` / `list`    | read   | Point / full snapshot                      |
//! | `index`           | read   | Bucket union for an example object         |
//! | `index_keys` / `by_index` | read | Direct bucket lookup               |
//!
//! ## Example Usage
//!
//! ```
//! use indexcache::store::ThreadSafeStore;
//!
//! let store: ThreadSafeStore<u32, String, usize> = ThreadSafeStore::new();
//! store.add_indexer("len", Box::new(|s: &String| Ok(vec![s.len()]))).unwrap();
//!
//! store.add(1, "dd".to_string());
//! store.add(2, "eee".to_string());
//!
//! let twos = store.index_keys("len", &2, None).unwrap();
//! assert_eq!(twos, vec![1]);
//! ```

use std::hash::Hash;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::CacheError;
use crate::store::index::{IndexFn, Indexers, StoreIndex};

/// Optional strict less-than predicate for ordering query results.
pub type LessFn<'a, K> = Option<&'a dyn Fn(&K, &K) -> bool>;

struct Inner<K, V, I> {
    items: FxHashMap<K, V>,
    index: StoreIndex<K, V, I>,
}

/// Concurrent key→object map with incrementally maintained secondary indexes.
pub struct ThreadSafeStore<K, V, I = K> {
    inner: RwLock<Inner<K, V, I>>,
}

impl<K, V, I> ThreadSafeStore<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
    I: Eq + Hash + Clone,
{
    /// Creates an empty store with no indexes.
    pub fn new() -> Self {
        Self::with_indexers(Indexers::default())
    }

    /// Creates an empty store with the given index registrations.
    pub fn with_indexers(indexers: Indexers<I, V>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: FxHashMap::default(),
                index: StoreIndex::new(indexers),
            }),
        }
    }

    /// Inserts an object under `key`. Alias of [`update`](Self::update);
    /// re-adding an existing key overwrites the entry.
    pub fn add(&self, key: K, obj: V) {
        self.update(key, obj);
    }

    /// Upserts an object under `key`, re-bucketing it in every index within
    /// the same critical section.
    pub fn update(&self, key: K, obj: V) {
        let mut guard = self.inner.write();
        let Inner { items, index } = &mut *guard;
        index.update_indices(items.get(&key), Some(&obj), &key);
        items.insert(key, obj);
    }

    /// Removes the object under `key`, dropping it from every index bucket.
    /// No-op if the key is absent.
    pub fn delete(&self, key: &K) {
        let mut guard = self.inner.write();
        let Inner { items, index } = &mut *guard;
        if let Some(old) = items.get(key) {
            index.update_indices(Some(old), None, key);
            items.remove(key);
        }
    }

    /// Returns a clone of the object under `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.read().items.get(key).cloned()
    }

    /// Returns a snapshot of all objects, in unspecified order.
    pub fn list(&self) -> Vec<V> {
        self.inner.read().items.values().cloned().collect()
    }

    /// Returns a snapshot of all keys, in unspecified order.
    pub fn list_keys(&self) -> Vec<K> {
        self.inner.read().items.keys().cloned().collect()
    }

    /// Returns the number of stored objects.
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    /// Returns `true` if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Atomically discards all current items and indexes, installs
    /// `new_items`, and rebuilds every registered index from scratch.
    ///
    /// No reader can observe a partially replaced state.
    pub fn replace(&self, new_items: impl IntoIterator<Item = (K, V)>) {
        let mut guard = self.inner.write();
        let Inner { items, index } = &mut *guard;
        *items = new_items.into_iter().collect();
        index.reset();
        for (key, obj) in items.iter() {
            index.update_indices(None, Some(obj), key);
        }
        trace!(items = items.len(), "store contents replaced");
    }

    /// Returns objects matching `obj` under the named index: the object's
    /// indexed values are computed and the corresponding buckets unioned.
    ///
    /// `less` orders the result by key; `None` leaves the order unspecified.
    pub fn index(&self, index_name: &str, obj: &V, less: LessFn<'_, K>) -> Result<Vec<V>, CacheError> {
        let guard = self.inner.read();
        let key_set = guard.index.get_keys_from_index(index_name, obj)?;
        let keys = match less {
            Some(less) => key_set.sorted_by(less),
            None => key_set.unsorted_list(),
        };
        Ok(collect_objects(&guard.items, &keys))
    }

    /// Returns the keys bucketed under one already-known indexed value.
    pub fn index_keys(
        &self,
        index_name: &str,
        indexed_value: &I,
        less: LessFn<'_, K>,
    ) -> Result<Vec<K>, CacheError> {
        let guard = self.inner.read();
        let key_set = guard.index.get_keys_by_index(index_name, indexed_value)?;
        Ok(match less {
            Some(less) => key_set.sorted_by(less),
            None => key_set.unsorted_list(),
        })
    }

    /// Returns the objects bucketed under one already-known indexed value.
    pub fn by_index(
        &self,
        index_name: &str,
        indexed_value: &I,
        less: LessFn<'_, K>,
    ) -> Result<Vec<V>, CacheError> {
        let guard = self.inner.read();
        let key_set = guard.index.get_keys_by_index(index_name, indexed_value)?;
        let keys = match less {
            Some(less) => key_set.sorted_by(less),
            None => key_set.unsorted_list(),
        };
        Ok(collect_objects(&guard.items, &keys))
    }

    /// Registers a new index and back-fills it over all current items.
    ///
    /// Fails with [`CacheError::IndexConflict`] if the name is taken, or
    /// with [`CacheError::IndexFunction`] if the function fails on a stored
    /// object, in which case the registration is rolled back entirely.
    pub fn add_indexer(&self, index_name: &str, index_fn: IndexFn<I, V>) -> Result<(), CacheError> {
        let mut guard = self.inner.write();
        guard.index.add_indexer(index_name, index_fn)?;
        if let Err(err) = back_fill(&mut guard, index_name) {
            guard.index.remove_indexer(index_name);
            return Err(err);
        }
        debug!(index = index_name, "index registered and back-filled");
        Ok(())
    }

    /// Registers several indexes at once and back-fills each.
    ///
    /// Name conflicts reject the whole batch before anything is registered;
    /// a back-fill failure rolls back every index in the batch.
    pub fn add_indexers(&self, new_indexers: Indexers<I, V>) -> Result<(), CacheError> {
        let names: Vec<String> = new_indexers.keys().cloned().collect();
        let mut guard = self.inner.write();
        guard.index.add_indexers(new_indexers)?;
        for name in &names {
            if let Err(err) = back_fill(&mut guard, name) {
                for name in &names {
                    guard.index.remove_indexer(name);
                }
                return Err(err);
            }
        }
        debug!(indexes = ?names, "indexes registered and back-filled");
        Ok(())
    }
}

impl<K, V, I> Default for ThreadSafeStore<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
    I: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Re-indexes every stored item under one freshly registered index.
fn back_fill<K, V, I>(inner: &mut Inner<K, V, I>, index_name: &str) -> Result<(), CacheError>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    let Inner { items, index } = inner;
    for (key, obj) in items.iter() {
        index.apply_single_index(index_name, None, Some(obj), key)?;
    }
    Ok(())
}

fn collect_objects<K: Eq + Hash, V: Clone>(items: &FxHashMap<K, V>, keys: &[K]) -> Vec<V> {
    keys.iter().filter_map(|key| items.get(key).cloned()).collect()
}
