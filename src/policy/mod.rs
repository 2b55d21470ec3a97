//! Capacity-bounded eviction policies.
//!
//! The three policies track an ordering over *keys only*; they never hold
//! object values. A composing cache (see
//! [`EvictionCache`](crate::eviction_cache::EvictionCache)) drives the policy
//! and mirrors its decisions onto the store.
//!
//! ## Policy Comparison
//!
//! | Policy        | Eviction basis   | Repeat `put`            | Backing structures            |
//! |---------------|------------------|-------------------------|-------------------------------|
//! | [`FifoPolicy`]| Insertion order  | No-op                   | `KeyList` + position map      |
//! | [`LruPolicy`] | Recency of use   | Move to MRU end         | `KeyList` + position map      |
//! | [`LfuPolicy`] | Access frequency | Frequency counter += 1  | `FreqHeap` (min-heap)         |
//!
//! ## Capacity Semantics
//!
//! Shared by all three policies:
//! - Capacity is fixed at construction and never changes.
//! - `put` evicts **at most one** key per call, and only when the key is new
//!   and the policy is at capacity. A repeat `put` never evicts.
//! - `delete` and `reset` never trigger evictions.
//!
//! Each policy carries its own internal lock, so it is thread-safe
//! independently of any store it is composed with.

pub mod fifo;
pub mod lfu;
pub mod lru;

pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;

/// A pluggable, internally synchronized eviction policy over keys.
///
/// All operations are O(1) or O(log n). Implementations are `Send + Sync`
/// and take `&self`; callers never need an outer lock to use a policy,
/// though composing a policy with a store atomically is the caller's
/// problem (see [`EvictionCache`](crate::eviction_cache::EvictionCache)).
pub trait EvictionPolicy<K>: Send + Sync {
    /// Records an insert or access of `key`.
    ///
    /// If the key is new and the policy is at capacity, the policy first
    /// evicts one key according to its ordering and returns it.
    fn put(&self, key: K) -> Option<K>;

    /// Forgets `key`. No-op if the key is not tracked.
    fn delete(&self, key: &K);

    /// Removes and returns the current eviction victim, if any.
    fn evict(&self) -> Option<K>;

    /// Forgets every tracked key.
    fn reset(&self);

    /// Returns the number of tracked keys.
    fn len(&self) -> usize;

    /// Returns `true` if no keys are tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
