//! JSON-file backed [`BlobStore`] for native hosts.

use crate::BlobStore;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Default location: `<config dir>/blogdesk/storage.json`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("blogdesk").join("storage.json"))
}

/// Keeps every entry in memory and rewrites the whole file on each change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at [`default_path`].
    pub fn open_default() -> anyhow::Result<Self> {
        let path = default_path().ok_or_else(|| anyhow::anyhow!("Could not determine config dir"))?;
        Ok(Self::open(path))
    }

    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing, empty or corrupted file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!("Created directory: {:?}", parent);
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        return BTreeMap::new();
    }

    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => BTreeMap::new(),
        Ok(content) => match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to parse storage file at {:?}: {}", path, e);
                BTreeMap::new()
            }
        },
        Err(e) => {
            warn!("Failed to read storage file at {:?}: {}", path, e);
            BTreeMap::new()
        }
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}
