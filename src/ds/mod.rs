//! Policy-free data structures shared by the store and the eviction policies.

pub mod freq_heap;
pub mod key_list;
pub mod key_set;

pub use freq_heap::FreqHeap;
pub use key_list::{KeyList, SlotId};
pub use key_set::KeySet;
