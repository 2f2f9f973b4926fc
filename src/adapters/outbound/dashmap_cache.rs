//! DashMap Response Cache
//!
//! Implements ResponseCache using DashMap for lock-free concurrent access.

use crate::domain::ports::ResponseCache;
use crate::domain::value_objects::{CacheKey, Payload};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct CachedPayload {
    value: Payload,
    expires_at: Instant,
    last_used: u64,
}

/// DashMap-backed response cache.
///
/// Suited to clients shared by many tasks. Expired entries are dropped
/// lazily, or periodically once `start_gc` is running. Eviction at capacity
/// scans for the least recently used entry.
pub struct DashMapCache {
    entries: Arc<DashMap<CacheKey, CachedPayload>>,
    clock: AtomicU64,
    max_size: usize,
    ttl: Duration,
}

impl DashMapCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock: AtomicU64::new(0),
            max_size,
            ttl,
        }
    }

    /// Start the background garbage collection task.
    ///
    /// The task holds only a weak reference and stops once the cache is
    /// dropped. Must be called from within a tokio runtime.
    pub fn start_gc(&self, interval: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.entries);

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let Some(entries) = weak.upgrade() else {
                    tracing::debug!("cache dropped, stopping GC");
                    break;
                };

                let now = Instant::now();
                let before = entries.len();
                entries.retain(|_, entry| entry.expires_at > now);

                let removed_count = before.saturating_sub(entries.len());
                if removed_count > 0 {
                    tracing::debug!("cache GC removed {} expired entries", removed_count);
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn evict_lru(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().last_used)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            tracing::debug!("cache evicted {}", key);
        }
    }
}

impl Default for DashMapCache {
    fn default() -> Self {
        Self::new(super::DEFAULT_CACHE_MAXSIZE, super::DEFAULT_CACHE_TTL)
    }
}

impl ResponseCache for DashMapCache {
    fn contains(&self, key: &CacheKey) -> bool {
        let now = Instant::now();
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        self.entries.contains_key(key)
    }

    fn get(&self, key: &CacheKey) -> Option<Payload> {
        let now = Instant::now();
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);

        let mut entry = self.entries.get_mut(key)?;
        entry.last_used = self.tick();
        Some(entry.value.clone())
    }

    fn set(&self, key: CacheKey, value: Payload) {
        if self.max_size == 0 {
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            let now = Instant::now();
            self.entries.retain(|_, entry| entry.expires_at > now);
            while self.entries.len() >= self.max_size {
                self.evict_lru();
            }
        }

        let cached = CachedPayload {
            value,
            expires_at: Instant::now() + self.ttl,
            last_used: self.tick(),
        };
        self.entries.insert(key, cached);
    }

    fn delete(&self, key: &CacheKey) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn key(currency: &str) -> CacheKey {
        CacheKey::new("get-exchange-rate-info", vec![currency.to_string()])
    }

    fn text(s: &str) -> Payload {
        Payload::Text(s.to_string())
    }

    // ===== Set and Get Tests =====

    #[test]
    fn test_set_and_get() {
        let cache = DashMapCache::default();
        cache.set(key("USD"), text("rates"));

        assert!(cache.contains(&key("USD")));
        assert_eq!(cache.get(&key("USD")), Some(text("rates")));
    }

    #[test]
    fn test_get_nonexistent() {
        let cache = DashMapCache::default();
        assert_eq!(cache.get(&key("USD")), None);
        assert!(!cache.contains(&key("USD")));
    }

    #[test]
    fn test_delete() {
        let cache = DashMapCache::default();
        cache.set(key("USD"), text("rates"));
        cache.delete(&key("USD"));
        assert!(cache.is_empty());
    }

    // ===== Expiry Tests =====

    #[test]
    fn test_expired_entry_is_absent() {
        let cache = DashMapCache::new(8, Duration::from_millis(20));
        cache.set(key("USD"), text("rates"));
        std::thread::sleep(Duration::from_millis(60));

        assert!(!cache.contains(&key("USD")));
        assert_eq!(cache.get(&key("USD")), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_gc_removes_expired() {
        let cache = DashMapCache::new(8, Duration::from_millis(10));
        cache.set(key("USD"), text("a"));
        cache.set(key("EUR"), text("b"));
        let _gc = cache.start_gc(Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_gc_stops_when_cache_dropped() {
        let cache = DashMapCache::new(8, Duration::from_secs(60));
        cache.set(key("USD"), text("a"));
        let gc = cache.start_gc(Duration::from_millis(10));

        drop(cache);

        let finished = tokio::time::timeout(Duration::from_secs(1), gc).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }

    // ===== Eviction Tests =====

    #[test]
    fn test_lru_eviction() {
        let cache = DashMapCache::new(2, Duration::from_secs(60));
        cache.set(key("USD"), text("a"));
        cache.set(key("EUR"), text("b"));
        assert!(cache.get(&key("USD")).is_some());

        cache.set(key("GBP"), text("c"));

        assert!(cache.contains(&key("USD")));
        assert!(!cache.contains(&key("EUR")));
        assert!(cache.contains(&key("GBP")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_overwrite_at_capacity_keeps_others() {
        let cache = DashMapCache::new(2, Duration::from_secs(60));
        cache.set(key("USD"), text("a"));
        cache.set(key("EUR"), text("b"));
        cache.set(key("USD"), text("c"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("USD")), Some(text("c")));
    }
}
