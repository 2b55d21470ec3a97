//! indexcache: thread-safe indexed object caches with pluggable eviction.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod cache;
pub mod ds;
pub mod error;
pub mod eviction_cache;
pub mod policy;
pub mod prelude;
pub mod store;
pub mod traits;
