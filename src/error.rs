//! Error types for the indexcache library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: every recoverable failure the library reports to callers.
//! - [`DynError`]: the boxed error type caller-supplied key and index
//!   functions return.
//!
//! Failure of an index function during steady-state index maintenance is
//! deliberately *not* represented here: once an object has been accepted into
//! the store, its index functions are expected to be total, and a failure at
//! that point means the computed index state is invalid. That path panics
//! (see [`StoreIndex`](crate::store::index::StoreIndex)) instead of returning
//! an error. The same failure during registration back-fill or a query is
//! recoverable and surfaces as [`CacheError::IndexFunction`].

use std::fmt;

use thiserror::Error;

/// Boxed error returned by caller-supplied key and index functions.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by stores, facades, and eviction-backed caches.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The caller-supplied key function failed for an object.
    ///
    /// Carries a `Debug` rendering of the offending object and the
    /// underlying cause.
    #[error("couldn't derive key for object {object}: {source}")]
    KeyDerivation {
        /// `Debug` rendering of the object the key function rejected.
        object: String,
        /// Underlying failure reported by the key function.
        source: DynError,
    },

    /// An index with the same name is already registered.
    ///
    /// Registration is rejected atomically; no part of the conflicting
    /// registration takes effect.
    #[error("indexer conflict: {name}")]
    IndexConflict {
        /// The conflicting index name(s).
        name: String,
    },

    /// A query referenced an index name that was never registered.
    #[error("index with name {name} does not exist")]
    UnknownIndex {
        /// The unregistered index name.
        name: String,
    },

    /// An index function failed on a recoverable path (query, or back-fill
    /// during registration).
    #[error("unable to calculate index entry{} on index {name}: {source}", key_context(.key))]
    IndexFunction {
        /// Name of the index whose function failed.
        name: String,
        /// `Debug` rendering of the key being back-filled, if any.
        key: Option<String>,
        /// Underlying failure reported by the index function.
        source: DynError,
    },

    /// `evict()` was called on a cache whose policy tracks no keys.
    #[error("no items to evict")]
    EmptyEviction,
}

impl CacheError {
    /// Builds a [`CacheError::KeyDerivation`] from the offending object.
    pub fn key_derivation<V: fmt::Debug>(object: &V, source: DynError) -> Self {
        CacheError::KeyDerivation {
            object: format!("{object:?}"),
            source,
        }
    }
}

fn key_context(key: &Option<String>) -> String {
    match key {
        Some(key) => format!(" for key {key}"),
        None => String::new(),
    }
}
