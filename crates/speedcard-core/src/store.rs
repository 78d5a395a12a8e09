//! Snapshot persistence.
//!
//! Two layers:
//! - [`StorageBackend`]: a raw key-value slot store.
//!   [`FileBackend`] keeps one JSON file per key,
//!   [`MemoryBackend`] keeps everything in a shared map for tests.
//! - [`PersistentStore`]: the load/save/clear capability the session uses.
//!   [`SnapshotStore`] implements it for any backend, under one fixed key,
//!   with the roster-size guard applied on load.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::StoreError;
use crate::entry::{Entry, EntryList};

/// Slot the roster snapshot lives under.
pub const DEFAULT_STORAGE_KEY: &str = "paginatedData";

/// Raw string storage addressed by key.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a key that is not present is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Load/save/clear of the whole entry list.
pub trait PersistentStore {
    /// `None` means "use the default list": the slot is empty, unreadable,
    /// malformed, or holds a roster of the wrong shape.
    fn load(&self) -> Option<EntryList>;
    fn save(&mut self, list: &EntryList) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<S: PersistentStore + ?Sized> PersistentStore for Box<S> {
    fn load(&self) -> Option<EntryList> {
        (**self).load()
    }

    fn save(&mut self, list: &EntryList) -> Result<(), StoreError> {
        (**self).save(list)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// In-memory backend. Clones share the same map, so a test can drop a
/// session and open a new one over the "same" storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.slots
            .lock()
            .map_err(|_| StoreError::Backend("memory storage lock poisoned".to_string()))
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Platform data directory: `<data_dir>/speedcard`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("speedcard"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write next to the target and rename, so a crash never leaves half a snapshot.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The whole roster serialized as JSON under one fixed key.
#[derive(Debug, Clone)]
pub struct SnapshotStore<B> {
    backend: B,
    key: String,
    roster_size: usize,
}

impl<B: StorageBackend> SnapshotStore<B> {
    pub fn new(backend: B, key: impl Into<String>, roster_size: usize) -> Self {
        Self {
            backend,
            key: key.into(),
            roster_size,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn roster_size(&self) -> usize {
        self.roster_size
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: StorageBackend> PersistentStore for SnapshotStore<B> {
    fn load(&self) -> Option<EntryList> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no snapshot stored");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read snapshot");
                return None;
            }
        };

        let entries: Vec<Entry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding malformed snapshot");
                return None;
            }
        };

        let list = EntryList::from_entries(entries);
        if !list.is_well_formed(self.roster_size) {
            tracing::info!(
                key = %self.key,
                len = list.len(),
                expected = self.roster_size,
                "discarding snapshot from a different roster"
            );
            return None;
        }

        tracing::debug!(key = %self.key, flagged = list.flagged_count(), "snapshot loaded");
        Some(list)
    }

    fn save(&mut self, list: &EntryList) -> Result<(), StoreError> {
        let json = serde_json::to_string(list)?;
        self.backend.set(&self.key, &json)?;
        tracing::trace!(key = %self.key, bytes = json.len(), "snapshot saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(&self.key)?;
        tracing::debug!(key = %self.key, "snapshot cleared");
        Ok(())
    }
}
