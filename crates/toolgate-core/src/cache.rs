//! Key-value cache store contract and an in-process implementation.

use crate::error::Result;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// External key-value store with per-entry TTL.
///
/// Calls are synchronous and may be slow. Failures are reported as
/// [`crate::Error::Cache`] and propagate to the caller unchanged.
pub trait CacheStore: Send + Sync {
    /// Read a live entry.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write an entry that expires after `ttl`.
    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

    /// Remove an entry. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// Number of entries at which [`InMemoryCacheStore`] first sweeps expired
/// entries during a write.
pub const PRUNE_THRESHOLD: usize = 1024;

struct Entry {
    value: Value,
    // `None` when `now + ttl` does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

struct State {
    entries: HashMap<String, Entry>,
    prune_at: usize,
}

impl Default for State {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            prune_at: PRUNE_THRESHOLD,
        }
    }
}

impl State {
    fn prune(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live(now));
        self.prune_at = PRUNE_THRESHOLD.max(self.entries.len() * 2);
        before - self.entries.len()
    }
}

/// Process-local [`CacheStore`].
///
/// Expired entries are dropped when read, and swept in bulk once the store
/// grows past [`PRUNE_THRESHOLD`] (then past twice the live count).
#[derive(Default)]
pub struct InMemoryCacheStore {
    state: Mutex<State>,
}

impl InMemoryCacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Whether `key` holds a live entry.
    pub fn contains(&self, key: &str) -> bool {
        self.state
            .lock()
            .entries
            .get(key)
            .is_some_and(|e| e.is_live(Instant::now()))
    }

    /// Drop every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.state.lock().prune(Instant::now())
    }
}

impl CacheStore for InMemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut state = self.state.lock();
        match state.entries.get(key) {
            Some(entry) if entry.is_live(Instant::now()) => Ok(Some(entry.value.clone())),
            Some(_) => {
                state.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut state = self.state.lock();
        if state.entries.len() >= state.prune_at && !state.entries.contains_key(key) {
            let removed = state.prune(now);
            tracing::trace!(removed, remaining = state.entries.len(), "Pruned cache store");
        }
        state.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now.checked_add(ttl),
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.state.lock().entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_delete() {
        let store = InMemoryCacheStore::new();
        assert!(store.is_empty());

        store.set("k", json!({"a": 1}), Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!({"a": 1})));
        assert!(store.contains("k"));

        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.delete("k").unwrap();
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let store = InMemoryCacheStore::new();
        store.set("k", json!(1), Duration::ZERO).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let store = InMemoryCacheStore::new();
        store.set("k", json!(1), Duration::MAX).unwrap();
        store
            .set("j", json!(2), Duration::from_secs(i64::MAX as u64))
            .unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(1)));
        assert_eq!(store.get("j").unwrap(), Some(json!(2)));
        assert_eq!(store.purge_expired(), 0);
    }

    #[test]
    fn test_expired_entries_are_swept_on_write() {
        let store = InMemoryCacheStore::new();
        for i in 0..PRUNE_THRESHOLD * 3 {
            store.set(&format!("k{i}"), json!(i), Duration::ZERO).unwrap();
            assert!(store.len() <= PRUNE_THRESHOLD);
        }
    }

    #[test]
    fn test_sweep_keeps_live_entries() {
        let store = InMemoryCacheStore::new();
        store.set("live", json!(true), Duration::from_secs(60)).unwrap();
        for i in 0..PRUNE_THRESHOLD {
            store.set(&format!("k{i}"), json!(i), Duration::ZERO).unwrap();
        }
        assert!(store.len() < PRUNE_THRESHOLD);
        assert_eq!(store.get("live").unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_purge_expired() {
        let store = InMemoryCacheStore::new();
        store.set("a", json!(1), Duration::ZERO).unwrap();
        store.set("b", json!(2), Duration::from_secs(60)).unwrap();
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let store = InMemoryCacheStore::new();
        store.set("k", json!(1), Duration::from_secs(60)).unwrap();
        store.set("k", json!(2), Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }
}
