//! Key/value storage backends
//!
//! Everything persisted is a small JSON document under a fixed key, so the
//! backends only need string get/set/remove.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

/// Storage backend failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt data: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("unsupported save version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Durable string storage keyed by name
pub trait ScoreStorage {
    /// Read a value. `Ok(None)` when nothing was ever stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove a value. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same map, so a "reopened" store sees
/// what the previous one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one value
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.borrow().contains_key(key)
    }
}

impl ScoreStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }
}

/// Keys map straight to file names, so keep them boring
fn check_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{ScoreStorage, StorageError, check_key};

    /// Environment override for the data directory
    pub const DATA_DIR_ENV: &str = "KITCHEN_RUSH_DATA_DIR";

    /// One `<key>.json` file per key inside a directory
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        /// Open (creating if needed) a storage directory
        pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
            let dir = dir.into();
            std::fs::create_dir_all(&dir)?;
            Ok(Self { dir })
        }

        /// `$KITCHEN_RUSH_DATA_DIR`, else the per-user data dir, else `./.kitchen-rush`
        pub fn open_default() -> Result<Self, StorageError> {
            Self::open(Self::default_dir())
        }

        pub fn default_dir() -> PathBuf {
            if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
                return PathBuf::from(dir);
            }
            dirs::data_local_dir()
                .map(|d| d.join("kitchen-rush"))
                .unwrap_or_else(|| PathBuf::from(".kitchen-rush"))
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
            check_key(key)?;
            Ok(self.dir.join(format!("{key}.json")))
        }
    }

    impl ScoreStorage for FileStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            let path = self.path_for(key)?;
            match std::fs::read_to_string(&path) {
                Ok(json) => Ok(Some(json)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let path = self.path_for(key)?;
            // Write beside the target then swap, so a crash never leaves half a file
            let tmp = path.with_extension("json.tmp");
            std::fs::write(&tmp, value)?;
            std::fs::rename(&tmp, &path)?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            let path = self.path_for(key)?;
            match std::fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{ScoreStorage, StorageError, check_key};

    /// Browser `window.localStorage`
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        pub fn open() -> Result<Self, StorageError> {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| StorageError::Unavailable("window.localStorage".to_string()))?;
            Ok(Self { storage })
        }
    }

    impl ScoreStorage for LocalStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            check_key(key)?;
            self.storage
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            check_key(key)?;
            self.storage
                .set_item(key, value)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            check_key(key)?;
            self.storage
                .remove_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }
    }
}
