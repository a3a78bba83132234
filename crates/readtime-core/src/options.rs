//! Key/value option storage.
//!
//! Settings live in a generic option store shared by the whole process. The
//! core only needs `get` and `set`; the backend decides how values persist.
//! Two backends ship with the crate:
//!
//! - [`MemoryOptionStore`] for tests and embedding
//! - [`JsonFileStore`], a JSON object on disk, used by the CLI
//!
//! # Example
//! ```
//! use readtime_core::options::{MemoryOptionStore, OptionStore};
//! use serde_json::json;
//!
//! let mut store = MemoryOptionStore::new();
//! store.set("readtime_reading_speed", json!(250)).unwrap();
//! assert_eq!(store.get("readtime_reading_speed"), Some(json!(250)));
//! ```

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Prefix applied to every option key owned by readtime.
pub const OPTION_PREFIX: &str = "readtime_";

/// Build the namespaced store key for a setting name.
pub fn option_key(name: &str) -> String {
    format!("{OPTION_PREFIX}{name}")
}

/// A generic key/value option store.
pub trait OptionStore {
    /// Fetch a value, or `None` if the key was never set.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store a value, replacing any previous one.
    fn set(&mut self, key: &str, value: Value) -> StoreResult<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn delete(&mut self, key: &str) -> StoreResult<()>;
}

/// In-memory option store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryOptionStore {
    values: BTreeMap<String, Value>,
}

impl MemoryOptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for MemoryOptionStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl OptionStore for MemoryOptionStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> StoreResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Option store backed by a JSON object file.
///
/// Values are read once on [`open`](Self::open) and written back on every
/// `set`/`delete`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Utf8PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Utf8Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(path.as_std_path()) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path, "option file does not exist yet");
                BTreeMap::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(path = %path, keys = values.len(), "option file loaded");
        Ok(Self { path, values })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write all values back to disk, creating parent directories.
    pub fn save(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_str().is_empty()
        {
            std::fs::create_dir_all(parent.as_std_path()).map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(self.path.as_std_path(), json + "\n").map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path, keys = self.values.len(), "option file saved");
        Ok(())
    }
}

impl OptionStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> StoreResult<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}
