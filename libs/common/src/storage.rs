//! Durable key/value storage for the Taller console
//!
//! This module provides the persistence the console session relies on
//! between runs: a small string-to-string store with get, set and remove.
//! `FileStorage` keeps the entries in a JSON object on disk and
//! `MemoryStorage` keeps them in process memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};

/// Storage key holding the bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Storage key holding the role name of the logged-in user
pub const USER_ROLE_KEY: &str = "userRole";

/// A string key/value store that outlives the process
pub trait DurableStorage: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Set a key-value pair, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Configuration for the file-backed store
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the JSON file holding the entries
    pub path: PathBuf,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `TALLER_STORAGE_PATH`: path of the storage file
    ///   (default: `<local data dir>/taller/storage.json`)
    pub fn from_env() -> StorageResult<Self> {
        if let Ok(path) = std::env::var("TALLER_STORAGE_PATH") {
            return Ok(Self {
                path: PathBuf::from(path),
            });
        }

        let base = dirs::data_local_dir().ok_or_else(|| {
            StorageError::Configuration(
                "no local data directory; set TALLER_STORAGE_PATH".to_string(),
            )
        })?;

        Ok(Self {
            path: base.join("taller").join("storage.json"),
        })
    }
}

/// Store backed by a JSON object file
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open the store described by `config`, creating parent directories
    pub fn open(config: &StorageConfig) -> StorageResult<Self> {
        if let Some(parent) = config.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        info!("File storage opened at {}", config.path.display());
        Ok(Self {
            path: config.path.clone(),
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<BTreeMap<String, String>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        serde_json::from_slice(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    // Write to a sibling file then rename so readers never see a torn file.
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let body = serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn update<F>(&self, mutate: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let (mut entries, corrupt) = match self.read_entries() {
            Ok(entries) => (entries, false),
            Err(StorageError::Corrupt { path, source }) => {
                warn!("Discarding corrupt storage file {}: {}", path.display(), source);
                (BTreeMap::new(), true)
            }
            Err(e) => return Err(e),
        };
        if mutate(&mut entries) || corrupt {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!("Persisting key {}", key);
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        debug!("Removing key {}", key);
        self.update(|entries| entries.remove(key).is_some())
    }
}

/// Store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}
