use super::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// String-keyed persistent storage, the seam between the store and disk
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Storage backed by a single JSON object file (`{"key": "value", ...}`).
///
/// The whole file is rewritten atomically on every `set_item`, so a crash
/// mid-write leaves the previous snapshot in place.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file, starting empty if it doesn't exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = read_file(&path)?;
        let entries = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Storage file is not a JSON object of strings: {}", path.display()))?
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened storage");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&next)?;
        atomic_write(&self.path, &json)
            .with_context(|| format!("Failed to write key '{}'", key))?;

        // Only adopt the new snapshot once it is on disk
        self.entries = next;
        Ok(())
    }
}

/// In-memory storage for tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a single pre-populated entry
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }

    /// Number of `set_item` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp_dir = tempdir().unwrap();
        let storage = FileStorage::open(temp_dir.path().join("storage.json")).unwrap();
        assert_eq!(storage.get_item("todos").unwrap(), None);
    }

    #[test]
    fn test_set_and_reopen() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set_item("mode", "dark").unwrap();
        storage.set_item("todos", "[]").unwrap();
        storage.set_item("mode", "light").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("mode").unwrap().as_deref(), Some("light"));
        assert_eq!(reopened.get_item("todos").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_open_rejects_non_object() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(FileStorage::open(&path).is_err());
    }

    #[test]
    fn test_failed_write_keeps_previous_snapshot() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing-dir").join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        assert!(storage.set_item("mode", "dark").is_err());
        assert_eq!(storage.get_item("mode").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_counts_writes() {
        let mut storage = MemoryStorage::with_item("todos", "[]");
        assert_eq!(storage.writes(), 0);
        storage.set_item("todos", "[{}]").unwrap();
        assert_eq!(storage.writes(), 1);
        assert_eq!(storage.get_item("todos").unwrap().as_deref(), Some("[{}]"));
    }
}
