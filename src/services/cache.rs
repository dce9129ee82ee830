use dashmap::DashMap;
use std::time::{Duration, Instant};

/// A thread-safe cache with TTL support.
///
/// Used for slow-changing reference data such as exchange market catalogs.
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> Cache<V> {
    /// Create a new cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a live value, evicting it if expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            return Some(entry.value.clone());
        }
        drop(entry);
        self.data.remove(key);
        None
    }

    /// Store a value for the cache TTL.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.data.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_insert_and_get() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("markets", vec!["BTCUSDT".to_string()]);
        assert_eq!(cache.get("markets"), Some(vec!["BTCUSDT".to_string()]));
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn test_cache_expiration() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.insert("markets", 1u32);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("markets"), None);
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("markets", 1u32);
        cache.insert("markets", 2u32);
        assert_eq!(cache.get("markets"), Some(2));
    }
}
