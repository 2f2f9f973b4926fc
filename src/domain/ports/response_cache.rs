//! Response Cache Port
//!
//! Defines the interface for storing raw API payloads between calls.

use crate::domain::value_objects::{CacheKey, Payload};

/// Bounded key/value store for API payloads.
///
/// This is an outbound port so callers can swap the in-process default for
/// a shared or distributed store. Implementations apply their TTL at
/// insertion time and treat expired entries as absent.
pub trait ResponseCache: Send + Sync {
    /// Whether an unexpired entry exists for the key.
    fn contains(&self, key: &CacheKey) -> bool;

    /// Get the payload for a key, or None if absent or expired.
    fn get(&self, key: &CacheKey) -> Option<Payload>;

    /// Store a payload, evicting the least recently used entry when full.
    fn set(&self, key: CacheKey, value: Payload);

    /// Drop an entry if present.
    fn delete(&self, key: &CacheKey);
}
