//! Last-known-good response cache.
//!
//! Every successful city lookup overwrites an entry keyed by the literal
//! query string (trimmed, case-sensitive, exactly as typed). Entries are
//! read only when a live request fails at the transport level, so a city the
//! user has seen before still renders while offline.
//!
//! Coordinate lookups have no literal key and never touch this store.
//!
//! The store is bounded: a most-recent-first key index caps the cache at
//! [`MAX_CACHED`] entries and evicts the oldest beyond that.

use tracing::warn;

use crate::model::CurrentConditions;
use crate::storage::SharedStore;

/// Store-key prefix for cached payloads.
pub const CACHE_KEY_PREFIX: &str = "weather_";

/// Store key for the eviction-order index.
pub const CACHE_INDEX_KEY: &str = "weather_cache_index";

/// Entries beyond this many are evicted oldest-first.
pub const MAX_CACHED: usize = 16;

#[derive(Debug)]
pub struct ResponseCache {
    store: SharedStore,
    index: Vec<String>,
}

impl ResponseCache {
    /// Open the cache over a store. A missing or malformed index loads as
    /// empty; any orphaned payload entries are simply never read again.
    pub fn open(store: SharedStore) -> Self {
        let index = store
            .lock()
            .get(CACHE_INDEX_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default();
        Self { store, index }
    }

    /// Unconditionally overwrite the entry for a literal query and refresh
    /// its position in the eviction order.
    pub fn put(&mut self, query: &str, payload: &CurrentConditions) {
        let raw = match serde_json::to_string(payload) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "failed to encode payload for caching");
                return;
            }
        };

        let mut store = self.store.lock();
        if let Err(err) = store.set(&entry_key(query), &raw) {
            warn!(%err, query, "failed to write cache entry");
            return;
        }

        self.index.retain(|k| k != query);
        self.index.insert(0, query.to_string());
        while self.index.len() > MAX_CACHED {
            if let Some(evicted) = self.index.pop() {
                if let Err(err) = store.remove(&entry_key(&evicted)) {
                    warn!(%err, query = %evicted, "failed to remove evicted cache entry");
                }
            }
        }

        match serde_json::to_string(&self.index) {
            Ok(raw) => {
                if let Err(err) = store.set(CACHE_INDEX_KEY, &raw) {
                    warn!(%err, "failed to persist cache index");
                }
            }
            Err(err) => warn!(%err, "failed to encode cache index"),
        }
    }

    /// Look up the last payload stored under a literal query. A malformed
    /// stored payload reads as absent.
    pub fn get(&self, query: &str) -> Option<CurrentConditions> {
        self.store
            .lock()
            .get(&entry_key(query))
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }
}

fn entry_key(query: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{query}")
}
