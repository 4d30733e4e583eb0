//! Device-scoped persistent key/value storage.
//!
//! This is the `localStorage` of the browser build: a small string map that
//! survives reloads on one device and is never shared across devices. The
//! theme controller uses it to repaint the last applied theme before the
//! remote subscription resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashmap::DashMap;
use log::warn;

/// Persistent key/value strings. Reads and writes are infallible at the
/// interface: persistence failures degrade to in-memory behavior and are
/// logged, since losing a cached theme name is never fatal.
pub trait LocalStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Volatile [`LocalStorage`], for tests and ephemeral sessions.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: std::sync::Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// [`LocalStorage`] persisted as one flat JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or create on first write) the storage file at `path`. An
    /// unreadable or malformed file starts empty rather than failing.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("[local] ignoring malformed storage file {}: {err}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let raw = match serde_json::to_string_pretty(entries) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("[local] failed to encode storage file: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, raw) {
            warn!("[local] failed to write {}: {err}", self.path.display());
        }
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("storage entries poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().expect("storage entries poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("storage entries poisoned");
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("activeThemeName"), None);
        storage.set("activeThemeName", "Roxo Vibrante");
        assert_eq!(storage.get("activeThemeName").as_deref(), Some("Roxo Vibrante"));
        storage.remove("activeThemeName");
        assert_eq!(storage.get("activeThemeName"), None);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        {
            let storage = FileStorage::open(&path);
            storage.set("activeThemeName", "Verde Natureza");
        }

        let reopened = FileStorage::open(&path);
        assert_eq!(
            reopened.get("activeThemeName").as_deref(),
            Some("Verde Natureza")
        );
    }

    #[test]
    fn malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        std::fs::write(&path, "not json at all").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get("anything"), None);

        // And it heals on the next write.
        storage.set("k", "v");
        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("k").as_deref(), Some("v"));
    }
}
