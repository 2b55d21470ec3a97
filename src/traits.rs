//! Core trait seams for cache frontends.
//!
//! ## Trait Hierarchy
//!
//! ```text
//!   ObjectStore<K, V>          keyed CRUD over whole objects
//!       └── IndexedStore<K, V, I>   + secondary index queries
//! ```
//!
//! Frontends derive keys themselves via a [`KeyFn`], so every trait method
//! that writes takes only the object. All methods take `&self`; implementors
//! synchronize internally.

use crate::error::{CacheError, DynError};
use crate::store::index::{IndexFn, Indexers};
use crate::store::thread_safe::LessFn;

/// Derives the storage key from an object.
///
/// Failures surface as [`CacheError::KeyDerivation`] from the calling
/// frontend method.
pub type KeyFn<K, V> = Box<dyn Fn(&V) -> Result<K, DynError> + Send + Sync>;

/// Keyed object storage with internally derived keys.
pub trait ObjectStore<K, V> {
    /// Inserts `obj` under its derived key, overwriting any existing entry.
    fn add(&self, obj: V) -> Result<(), CacheError>;

    /// Upserts `obj` under its derived key.
    fn update(&self, obj: V) -> Result<(), CacheError>;

    /// Removes the entry for `obj`'s derived key, if present.
    fn delete(&self, obj: &V) -> Result<(), CacheError>;

    /// Returns the stored object matching `obj`'s derived key.
    fn get(&self, obj: &V) -> Result<Option<V>, CacheError>;

    /// Returns the stored object under `key`.
    fn get_by_key(&self, key: &K) -> Option<V>;

    /// Returns a snapshot of all stored objects.
    fn list(&self) -> Vec<V>;

    /// Returns a snapshot of all stored keys.
    fn list_keys(&self) -> Vec<K>;

    /// Atomically replaces the entire contents with `items`, keyed by the
    /// frontend's key function.
    fn replace(&self, items: Vec<V>) -> Result<(), CacheError>;

    /// Number of stored objects.
    fn len(&self) -> usize;

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Object storage that also answers secondary-index queries.
pub trait IndexedStore<K, V, I>: ObjectStore<K, V> {
    /// Returns objects sharing an indexed value with the example `obj`.
    fn index(&self, index_name: &str, obj: &V, less: LessFn<'_, K>) -> Result<Vec<V>, CacheError>;

    /// Returns the keys bucketed under `indexed_value`.
    fn index_keys(
        &self,
        index_name: &str,
        indexed_value: &I,
        less: LessFn<'_, K>,
    ) -> Result<Vec<K>, CacheError>;

    /// Returns the objects bucketed under `indexed_value`.
    fn by_index(
        &self,
        index_name: &str,
        indexed_value: &I,
        less: LessFn<'_, K>,
    ) -> Result<Vec<V>, CacheError>;

    /// Registers one index and back-fills it over current contents.
    fn add_indexer(&self, index_name: &str, index_fn: IndexFn<I, V>) -> Result<(), CacheError>;

    /// Registers several indexes at once, all-or-nothing.
    fn add_indexers(&self, indexers: Indexers<I, V>) -> Result<(), CacheError>;
}
