//! Bounded in-memory entity cache
//!
//! Pure memory lookups in front of the database: entries are evicted by an
//! LRU bound on the entry count and by time since write, so out-of-band
//! database changes have bounded staleness. Absence is a normal result;
//! no cache operation can fail or perform I/O.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};


/// Eviction policy for one cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Maximum number of entries before least-recently-used eviction.
    pub max_entries: usize,
    /// Entries older than this are treated as absent and dropped.
    pub time_to_live: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_entries: 60,
            time_to_live: Duration::from_secs(60),
        }
    }
}

struct Entry<V> {
    value: V,
    written_at: Instant,
}

/// Size- and age-bounded key→entity map, one instance per entity type.
pub struct RosterCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    entries: Mutex<LruCache<K, Entry<V>>>,
    time_to_live: Duration,
}

impl<K, V> RosterCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(policy: CachePolicy) -> Self {
        let capacity =
            NonZeroUsize::new(policy.max_entries).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            time_to_live: policy.time_to_live,
        }
    }

    /// Look a value up, treating entries past the time-to-live as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get(key) {
            if entry.written_at.elapsed() <= self.time_to_live {
                return Some(entry.value.clone());
            }
            entries.pop(key);
        }
        None
    }

    /// Insert or overwrite; may evict the least-recently-used entry.
    pub fn put(&self, key: K, value: V) {
        let entry = Entry {
            value,
            written_at: Instant::now(),
        };
        self.entries.lock().unwrap().put(key, entry);
    }

    /// Remove the entry if present; no-op otherwise.
    pub fn invalidate(&self, key: &K) {
        self.entries.lock().unwrap().pop(key);
    }

    /// Drop every entry at once.
    pub fn invalidate_all(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Current number of entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
