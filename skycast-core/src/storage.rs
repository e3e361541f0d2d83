//! Key-value persistence capability.
//!
//! The session state that survives a restart (recent searches, cached
//! responses) goes through the [`KeyValueStore`] trait. The default backend
//! is a single JSON object file under the platform data directory; tests and
//! embedders use the in-memory implementation.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::{collections::HashMap, fmt::Debug, fs, path::PathBuf, sync::Arc};
use tracing::warn;

/// String key-value store with the shape of browser `localStorage`.
///
/// Reads are infallible: a backend that cannot produce a value reports
/// absence. Writes surface their errors so callers can decide whether the
/// failure matters.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Store handle shared between the recency store and the response cache.
pub type SharedStore = Arc<Mutex<dyn KeyValueStore>>;

/// Wrap a store for shared use.
pub fn shared(store: impl KeyValueStore + 'static) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// File-backed store: one JSON object per file, loaded once at open and
/// rewritten on every mutation.
///
/// A missing or malformed file reads as empty. The previous contents are
/// lost on the next write in that case, which is the behavior a cleared
/// `localStorage` would have.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: PathBuf) -> Self {
        let entries: HashMap<String, String> = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        if entries.is_empty() && path.exists() {
            warn!(path = %path.display(), "store file unreadable or malformed, starting empty");
        }
        Self { path, entries }
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let raw = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize store contents")?;

        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Ephemeral store for tests and embedders that do not want files.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
