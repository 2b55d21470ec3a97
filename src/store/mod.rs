//! Key→object storage with secondary indexing.
//!
//! [`ThreadSafeStore`] owns the object map and a [`StoreIndex`] under one
//! reader/writer lock; the two are never observable out of sync.

pub mod index;
pub mod thread_safe;

pub use index::{IndexFn, Indexers, StoreIndex};
pub use thread_safe::{LessFn, ThreadSafeStore};
