//! Explicit TTL cache owned by process lifecycle.
//!
//! Constructed once and passed by reference into the services that need it
//! (the paper-set generator caches rendered variants here). Entries expire
//! after the configured TTL; expiry is checked on read and can be swept with
//! [`TtlCache::evict_expired`].

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, (V, Instant)>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a live entry. Expired entries are removed on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some((value, deadline)) if Instant::now() < *deadline => {
                    return Some(value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Entry exists but is stale; drop it under the write lock.
        self.entries.write().remove(key);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        let deadline = Instant::now() + self.ttl;
        self.entries.write().insert(key, (value, deadline));
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().remove(key).map(|(value, _)| value)
    }

    /// Sweep every expired entry.
    pub fn evict_expired(&self) {
        let now = Instant::now();
        self.entries.write().retain(|_, (_, deadline)| now < *deadline);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 42);
        assert_eq!(cache.get(&"k"), Some(42));
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = TtlCache::new(Duration::from_millis(0));
        cache.insert("k", 42);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evict_expired_sweeps_stale_entries() {
        let cache = TtlCache::new(Duration::from_millis(0));
        cache.insert(1, "a");
        cache.insert(2, "b");
        std::thread::sleep(Duration::from_millis(5));
        cache.evict_expired();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_remove_returns_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 7);
        assert_eq!(cache.remove(&"k"), Some(7));
        assert_eq!(cache.get(&"k"), None);
    }
}
