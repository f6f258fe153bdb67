//! Key/value storage backends
//!
//! [`KeyValueStorage`] mirrors browser local storage: string keys, string
//! values, whole-value overwrite. Two backends are provided:
//! - [`MemoryStorage`] for tests and dry runs
//! - [`FileStorage`], one JSON object file holding every key

use crate::error::PersistError;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// String key/value store
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage {
    /// Read a value
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Overwrite a value
    ///
    /// # Errors
    /// Returns an error when the backend cannot be written
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;

    /// Delete a value; deleting a missing key is not an error
    ///
    /// # Errors
    /// Returns an error when the backend cannot be written
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// In-memory storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file
///
/// The file is read once on open. Every write rewrites the whole file
/// through a sibling temporary file and a rename.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open storage at a path; a missing file is an empty store
    ///
    /// # Errors
    /// Returns [`PersistError::Io`] when the file cannot be read and
    /// [`PersistError::Corrupt`] when it is not a JSON object of strings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| PersistError::corrupt(path.display().to_string(), e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no storage file yet");
                BTreeMap::new()
            }
            Err(e) => return Err(PersistError::io(&path, e)),
        };
        Ok(Self { path, entries })
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|e| PersistError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| PersistError::io(&self.path, e))?;
        info!(path = %self.path.display(), keys = self.entries.len(), "storage written");
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.write_all() {
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        if let Some(old) = self.entries.remove(key) {
            if let Err(e) = self.write_all() {
                self.entries.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_basics() {
        let mut s = MemoryStorage::new();
        assert_eq!(s.get("k").unwrap(), None);
        s.set("k", "v").unwrap();
        assert_eq!(s.get("k").unwrap().as_deref(), Some("v"));
        s.remove("k").unwrap();
        s.remove("k").unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn file_storage_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        {
            let mut s = FileStorage::open(&path).unwrap();
            s.set("metricsData", "{}").unwrap();
            s.set("planState", "{\"strategies\":[]}").unwrap();
        }
        let s = FileStorage::open(&path).unwrap();
        assert_eq!(s.get("metricsData").unwrap().as_deref(), Some("{}"));
        assert!(s.get("planState").unwrap().is_some());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_and_empty_files_are_empty_stores() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileStorage::open(dir.path().join("none.json")).unwrap();
        assert_eq!(missing.get("x").unwrap(), None);

        let empty = dir.path().join("empty.json");
        fs::write(&empty, "  \n").unwrap();
        assert_eq!(FileStorage::open(&empty).unwrap().get("x").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            FileStorage::open(&path),
            Err(PersistError::Corrupt { .. })
        ));
    }
}
