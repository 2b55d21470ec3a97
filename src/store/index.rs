//! Secondary-index engine.
//!
//! `StoreIndex` maintains, per registered index name, a mapping from indexed
//! value to the [`KeySet`] of object keys currently producing that value. It
//! is driven by [`ThreadSafeStore`](crate::store::ThreadSafeStore), which
//! calls [`update_indices`](StoreIndex::update_indices) inside its own write
//! lock whenever an object is added, updated, or deleted; the engine itself
//! carries no lock.
//!
//! ## Invariant
//!
//! For every stored `(key, object)` pair and every registered index, the
//! index's buckets contain `key` exactly under the values its function
//! currently yields for `object`. Buckets that would become empty are
//! removed, never left behind.
//!
//! ## Fatal vs. recoverable index-function failures
//!
//! An index function may fail. On the query path and during registration
//! back-fill the failure is recoverable and returned as
//! [`CacheError::IndexFunction`]. During steady-state maintenance
//! (`update_indices` for an object already accepted into the store) a failure
//! would leave buckets half-updated for every future reader, so it is treated
//! as a programming error and panics. Callers who have fallible index
//! functions must validate objects before adding them.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::error;

use crate::ds::KeySet;
use crate::error::{CacheError, DynError};

/// Computes the indexed values of an object for one named index.
///
/// May yield zero, one, or many values; the object's key is bucketed under
/// each. Expected to be total for objects already accepted into the store.
pub type IndexFn<I, V> = Box<dyn Fn(&V) -> Result<Vec<I>, DynError> + Send + Sync>;

/// Named collection of index functions, as passed to store constructors.
pub type Indexers<I, V> = FxHashMap<String, IndexFn<I, V>>;

/// One index: indexed value → set of keys producing it.
type Buckets<K, I> = FxHashMap<I, KeySet<K>>;

/// Index registry plus the materialized buckets for every registered index.
pub struct StoreIndex<K, V, I> {
    indexers: Indexers<I, V>,
    indices: FxHashMap<String, Buckets<K, I>>,
}

impl<K, V, I> StoreIndex<K, V, I>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    /// Creates an engine with the given initial registrations and no buckets.
    pub fn new(indexers: Indexers<I, V>) -> Self {
        Self {
            indexers,
            indices: FxHashMap::default(),
        }
    }

    /// Returns the registered index names.
    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexers.keys().map(String::as_str)
    }

    /// Drops all buckets. Registrations survive; the store rebuilds buckets
    /// by replaying its items through [`update_indices`](Self::update_indices).
    pub fn reset(&mut self) {
        self.indices.clear();
    }

    /// Registers one index function.
    ///
    /// Fails with [`CacheError::IndexConflict`] if the name is taken.
    /// Back-filling existing items is the store's job.
    pub fn add_indexer(&mut self, name: &str, index_fn: IndexFn<I, V>) -> Result<(), CacheError> {
        if self.indexers.contains_key(name) {
            return Err(CacheError::IndexConflict {
                name: name.to_string(),
            });
        }
        self.indexers.insert(name.to_string(), index_fn);
        Ok(())
    }

    /// Registers several index functions at once.
    ///
    /// All-or-nothing: if any name conflicts with an existing registration,
    /// nothing is registered and the error lists every conflicting name.
    pub fn add_indexers(&mut self, new_indexers: Indexers<I, V>) -> Result<(), CacheError> {
        let existing = KeySet::from_map_keys(self.indexers.keys());
        let incoming = KeySet::from_map_keys(new_indexers.keys());
        if existing.has_any(incoming.iter()) {
            let mut conflicts = existing.intersection(&incoming).unsorted_list();
            conflicts.sort_unstable();
            return Err(CacheError::IndexConflict {
                name: conflicts.join(", "),
            });
        }
        self.indexers.extend(new_indexers);
        Ok(())
    }

    /// Unregisters an index and drops its buckets.
    ///
    /// Used by the store to roll back a registration whose back-fill failed;
    /// indexes are otherwise append-only.
    pub(crate) fn remove_indexer(&mut self, name: &str) {
        self.indexers.remove(name);
        self.indices.remove(name);
    }

    /// Re-buckets `key` in every registered index after a mutation.
    ///
    /// - create: `old` is `None`, `new` is the object
    /// - update: both are present
    /// - delete: `new` is `None`
    ///
    /// # Panics
    ///
    /// Panics if any index function fails; see the module docs.
    pub fn update_indices(&mut self, old: Option<&V>, new: Option<&V>, key: &K) {
        let Self { indexers, indices } = self;
        for (name, index_fn) in indexers.iter() {
            if let Err(err) = apply_one(name, index_fn, indices, old, new, key) {
                error!(index = name.as_str(), key = ?key, %err,
                       "index maintenance failed; store state would be inconsistent");
                panic!("{err}");
            }
        }
    }

    /// Re-buckets `key` in one named index.
    ///
    /// # Panics
    ///
    /// Panics if the index is unregistered or its function fails; both are
    /// invariant violations on this path.
    pub fn update_single_index(&mut self, name: &str, old: Option<&V>, new: Option<&V>, key: &K) {
        if let Err(err) = self.apply_single_index(name, old, new, key) {
            error!(index = name, key = ?key, %err,
                   "index maintenance failed; store state would be inconsistent");
            panic!("{err}");
        }
    }

    /// Fallible form of [`update_single_index`](Self::update_single_index);
    /// used directly for recoverable registration back-fill.
    pub(crate) fn apply_single_index(
        &mut self,
        name: &str,
        old: Option<&V>,
        new: Option<&V>,
        key: &K,
    ) -> Result<(), CacheError> {
        let index_fn = self.indexers.get(name).ok_or_else(|| CacheError::UnknownIndex {
            name: name.to_string(),
        })?;
        apply_one(name, index_fn, &mut self.indices, old, new, key)
    }

    /// Returns the keys matching `obj` under the named index.
    ///
    /// Computes the object's indexed values and unions the corresponding
    /// buckets (multi-valued indexing yields the union of all matches).
    pub fn get_keys_from_index(&self, name: &str, obj: &V) -> Result<KeySet<K>, CacheError> {
        let index_fn = self.indexers.get(name).ok_or_else(|| CacheError::UnknownIndex {
            name: name.to_string(),
        })?;
        let values = index_fn(obj).map_err(|source| CacheError::IndexFunction {
            name: name.to_string(),
            key: None,
            source,
        })?;

        let buckets = self.indices.get(name);
        if let [value] = values.as_slice() {
            return Ok(buckets
                .and_then(|b| b.get(value))
                .cloned()
                .unwrap_or_default());
        }

        let mut keys = KeySet::new();
        if let Some(buckets) = buckets {
            for value in &values {
                if let Some(bucket) = buckets.get(value) {
                    keys.extend(bucket.iter().cloned());
                }
            }
        }
        Ok(keys)
    }

    /// Returns the bucket for one already-known indexed value.
    pub fn get_keys_by_index(&self, name: &str, value: &I) -> Result<KeySet<K>, CacheError> {
        if !self.indexers.contains_key(name) {
            return Err(CacheError::UnknownIndex {
                name: name.to_string(),
            });
        }
        Ok(self
            .indices
            .get(name)
            .and_then(|buckets| buckets.get(value))
            .cloned()
            .unwrap_or_default())
    }
}

/// Applies one index's bucket changes for a single key mutation.
fn apply_one<K, V, I>(
    name: &str,
    index_fn: &IndexFn<I, V>,
    indices: &mut FxHashMap<String, Buckets<K, I>>,
    old: Option<&V>,
    new: Option<&V>,
    key: &K,
) -> Result<(), CacheError>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    I: Eq + Hash + Clone,
{
    let old_values = match old {
        Some(obj) => index_fn(obj).map_err(|source| index_fn_error(name, key, source))?,
        None => Vec::new(),
    };
    let new_values = match new {
        Some(obj) => index_fn(obj).map_err(|source| index_fn_error(name, key, source))?,
        None => Vec::new(),
    };

    // Fast path: a singleton value that didn't change needs no churn.
    if old_values.len() == 1 && new_values.len() == 1 && old_values[0] == new_values[0] {
        return Ok(());
    }

    let buckets = indices.entry(name.to_string()).or_default();
    for value in &old_values {
        if let Some(bucket) = buckets.get_mut(value) {
            bucket.remove(key);
            if bucket.is_empty() {
                buckets.remove(value);
            }
        }
    }
    for value in new_values {
        buckets.entry(value).or_default().insert(key.clone());
    }
    Ok(())
}

fn index_fn_error<K: std::fmt::Debug>(name: &str, key: &K, source: DynError) -> CacheError {
    CacheError::IndexFunction {
        name: name.to_string(),
        key: Some(format!("{key:?}")),
        source,
    }
}

impl<K, V, I> std::fmt::Debug for StoreIndex<K, V, I>
where
    K: std::fmt::Debug,
    I: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreIndex")
            .field("indexers", &self.indexers.keys().collect::<Vec<_>>())
            .field("indices", &self.indices)
            .finish()
    }
}
