//! In-memory LRU memoization of read queries
//!
//! Results are keyed by the full filter and page of the query. Writers clear
//! the cache wholesale, so entries never outlive the rows they were built from.
//! Every clear starts a new generation; a result read before a clear is
//! refused by [`QueryCache::put_if_current`].

use lru::LruCache;
use std::{
    hash::Hash,
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use crate::storage::models::{Page, StatFilter};

/// Default number of memoized player listings
pub const DEFAULT_CAPACITY: usize = 128;

/// Cache key for `/api/players` listings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayersCacheKey {
    pub filter: StatFilter,
    pub page: Page,
}

/// Thread-safe LRU cache
pub struct QueryCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    memory_cache: Arc<Mutex<LruCache<K, V>>>,
    memory_capacity: usize,
    generation: Arc<AtomicU64>,
}

impl<K, V> Clone for QueryCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            memory_cache: Arc::clone(&self.memory_cache),
            memory_capacity: self.memory_capacity,
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Create a cache holding at most `memory_capacity` entries (minimum 1)
    pub fn new(memory_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(memory_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            memory_cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            memory_capacity: capacity.get(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A poisoned lock is treated as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        self.memory_cache.lock().ok()?.get(key).cloned()
    }

    /// Insert `value` only if no clear happened since `generation` was read.
    pub fn put_if_current(&self, key: K, value: V, generation: u64) -> bool {
        match self.memory_cache.lock() {
            Ok(mut cache) if self.generation.load(Ordering::Acquire) == generation => {
                cache.put(key, value);
                true
            }
            _ => false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Drop every entry and start a new generation.
    pub fn clear(&self) {
        let mut cache = self
            .memory_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.generation.fetch_add(1, Ordering::AcqRel);
        cache.clear();
    }

    /// `(entries, capacity)`
    pub fn memory_stats(&self) -> (usize, usize) {
        let len = self.memory_cache.lock().map(|c| c.len()).unwrap_or(0);
        (len, self.memory_capacity)
    }
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
