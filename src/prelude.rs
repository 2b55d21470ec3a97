pub use crate::cache::Cache;
pub use crate::ds::{FreqHeap, KeyList, KeySet, SlotId};
pub use crate::error::{CacheError, DynError};
pub use crate::eviction_cache::EvictionCache;
pub use crate::policy::{EvictionPolicy, FifoPolicy, LfuPolicy, LruPolicy};
pub use crate::store::{IndexFn, Indexers, LessFn, StoreIndex, ThreadSafeStore};
pub use crate::traits::{IndexedStore, KeyFn, ObjectStore};
