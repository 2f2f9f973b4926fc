//! TTL Cache
//!
//! Default in-process ResponseCache: bounded, least-recently-used eviction,
//! uniform time-to-live applied at insertion.

use crate::domain::ports::ResponseCache;
use crate::domain::value_objects::{CacheKey, Payload};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Default maximum number of cached payloads.
pub const DEFAULT_CACHE_MAXSIZE: usize = 4096;

/// Default entry lifetime (24 hours).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct Entry {
    value: Payload,
    expires_at: Instant,
    tick: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<CacheKey, Entry>,
    /// Recency index: lowest tick is the least recently used key.
    recency: BTreeMap<u64, CacheKey>,
    next_tick: u64,
}

impl Inner {
    fn bump(&mut self) -> u64 {
        self.next_tick += 1;
        self.next_tick
    }

    fn remove(&mut self, key: &CacheKey) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(&entry.tick);
        Some(entry)
    }

    /// Drop the entry if it has expired; returns true when it is still live.
    fn live(&mut self, key: &CacheKey, now: Instant) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return false;
        };
        if entry.expires_at > now {
            return true;
        }
        self.remove(key);
        false
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.remove(&key);
        }
    }

    fn evict_lru(&mut self) -> Option<CacheKey> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

/// Bounded LRU cache with per-entry expiry.
///
/// Expiry is lazy: stale entries are dropped when touched or when room is
/// needed for a new key. All operations take a short internal lock, so one
/// instance can be shared between threads and tasks.
pub struct TtlCache {
    inner: Mutex<Inner>,
    max_size: usize,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_size,
            ttl,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.recency.clear();
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_MAXSIZE, DEFAULT_CACHE_TTL)
    }
}

impl ResponseCache for TtlCache {
    fn contains(&self, key: &CacheKey) -> bool {
        self.inner.lock().live(key, Instant::now())
    }

    fn get(&self, key: &CacheKey) -> Option<Payload> {
        let mut inner = self.inner.lock();
        if !inner.live(key, Instant::now()) {
            return None;
        }

        let tick = inner.bump();
        let entry = inner.entries.get_mut(key)?;
        let old_tick = std::mem::replace(&mut entry.tick, tick);
        let value = entry.value.clone();
        inner.recency.remove(&old_tick);
        inner.recency.insert(tick, key.clone());
        Some(value)
    }

    fn set(&self, key: CacheKey, value: Payload) {
        if self.max_size == 0 {
            return;
        }

        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.remove(&key);

        if inner.entries.len() >= self.max_size {
            inner.purge_expired(now);
        }
        while inner.entries.len() >= self.max_size {
            match inner.evict_lru() {
                Some(evicted) => tracing::debug!("cache evicted {}", evicted),
                None => break,
            }
        }

        let tick = inner.bump();
        inner.recency.insert(tick, key.clone());
        inner.entries.insert(
            key,
            Entry {
                value,
                expires_at: now + self.ttl,
                tick,
            },
        );
    }

    fn delete(&self, key: &CacheKey) {
        self.inner.lock().remove(key);
    }
}
