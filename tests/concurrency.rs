// ==============================================
// CONCURRENCY TESTS (integration)
// ==============================================
//
// Multi-threaded hammering of the store and the bounded frontend. These
// require real thread interleavings and cannot live inline.

use std::sync::{Arc, Barrier};
use std::thread;

use indexcache::eviction_cache::EvictionCache;
use indexcache::policy::LruPolicy;
use indexcache::store::ThreadSafeStore;
use indexcache::traits::ObjectStore;

/// Opt-in tracing output for debugging interleavings: `RUST_LOG=trace`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ==============================================
// Store: Readers Never See Torn State
// ==============================================
//
// Writers continuously re-bucket keys between two indexed values while
// readers query both buckets. Every key must appear in exactly one bucket
// per snapshot pair taken under a single query, and item/index agreement
// must hold once writers stop.

mod store_torn_reads {
    use super::*;

    #[test]
    fn index_queries_agree_with_items_after_races() {
        super::init_tracing();
        let store: Arc<ThreadSafeStore<u64, (u64, u8), u8>> = Arc::new(ThreadSafeStore::new());
        store
            .add_indexer("color", Box::new(|v: &(u64, u8)| Ok(vec![v.1])))
            .unwrap();

        let writers = 4;
        let keys_per_writer = 50u64;
        let barrier = Arc::new(Barrier::new(writers + 1));

        let mut handles = Vec::new();
        for w in 0..writers as u64 {
            let store = store.clone();
            let barrier = barrier.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                for round in 0..20u8 {
                    for i in 0..keys_per_writer {
                        let key = w * keys_per_writer + i;
                        store.update(key, (key, round % 2));
                    }
                }
            }));
        }

        let reader_store = store.clone();
        let reader_barrier = barrier.clone();
        let reader = thread::spawn(move || {
            reader_barrier.wait();
            for _ in 0..200 {
                let zero = reader_store.index_keys("color", &0, None).unwrap();
                let one = reader_store.index_keys("color", &1, None).unwrap();
                // The workload only upserts, so any key visible in a bucket
                // must be present in the item map.
                for key in zero.iter().chain(one.iter()) {
                    assert!(reader_store.get(key).is_some());
                }
            }
        });

        for handle in handles {
            handle.join().unwrap();
        }
        reader.join().unwrap();

        // Quiesced: every key sits in exactly the bucket its value names.
        let total = writers as u64 * keys_per_writer;
        assert_eq!(store.len(), total as usize);
        let zero = store.index_keys("color", &0, None).unwrap();
        let one = store.index_keys("color", &1, None).unwrap();
        assert_eq!(zero.len() + one.len(), total as usize);
        for key in zero {
            assert_eq!(store.get(&key).unwrap().1, 0);
        }
        for key in one {
            assert_eq!(store.get(&key).unwrap().1, 1);
        }
    }
}

// ==============================================
// Bounded Frontend: Capacity Under Contention
// ==============================================
//
// Concurrent adds, touches, and deletes across threads must never push the
// store past the policy's capacity, and the cache must still be fully
// usable afterwards.

mod bounded_contention {
    use super::*;

    #[test]
    fn capacity_holds_across_threads() {
        super::init_tracing();
        let capacity = 16;
        let cache: Arc<EvictionCache<u64, (u64, u64)>> = Arc::new(EvictionCache::new(
            Box::new(|v: &(u64, u64)| Ok(v.0)),
            Box::new(LruPolicy::new(capacity)),
        ));

        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let mut handles = Vec::new();

        for t in 0..threads as u64 {
            let cache = cache.clone();
            let barrier = barrier.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                for i in 0..500u64 {
                    let key = (t * 1000 + i) % 64;
                    match i % 5 {
                        0 | 1 | 2 => cache.add((key, i)).unwrap(),
                        3 => {
                            let _ = cache.get_by_key(&key);
                        }
                        _ => cache.delete(&(key, 0)).unwrap(),
                    }
                    assert!(cache.len() <= capacity);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= capacity);
        // Still functional after the storm.
        cache.add((u64::MAX, 1)).unwrap();
        assert_eq!(cache.get_by_key(&u64::MAX), Some((u64::MAX, 1)));
    }

    #[test]
    fn concurrent_forced_evictions_drain_without_panic() {
        super::init_tracing();
        let cache: Arc<EvictionCache<u64, (u64, u64)>> = Arc::new(EvictionCache::new(
            Box::new(|v: &(u64, u64)| Ok(v.0)),
            Box::new(LruPolicy::new(32)),
        ));
        for i in 0..32u64 {
            cache.add((i, i)).unwrap();
        }

        let threads = 4;
        let barrier = Arc::new(Barrier::new(threads));
        let mut handles = Vec::new();
        for _ in 0..threads {
            let cache = cache.clone();
            let barrier = barrier.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                let mut evicted = Vec::new();
                while let Ok((key, _)) = cache.evict() {
                    evicted.push(key);
                }
                evicted
            }));
        }

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();

        // Each key is evicted exactly once across all threads.
        assert_eq!(all, (0..32u64).collect::<Vec<_>>());
        assert!(cache.is_empty());
    }
}
