use log::{debug, trace, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::happy::StoreError;

/// Durable key-value storage backing the server settings.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

/// In-process store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// JSON file holding one namespace of string values.
///
/// The file is re-read on every access so writes from another process are
/// picked up, and a missing file reads as an empty namespace.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Opens the namespace `<dir>/<namespace>.json`. Nothing touches the disk
    /// until the first write.
    pub fn new(dir: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", namespace)),
        }
    }

    /// Platform config directory for the app, e.g. `~/.config/happy` on Linux.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("happy"))
            .unwrap_or_else(|| PathBuf::from(".happy"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            trace!("Store file {:?} does not exist yet", self.path);
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    /// Like [`load`](Self::load), but a file that no longer parses is
    /// replaced by an empty namespace so the next write repairs it. The flag
    /// reports whether that happened.
    fn load_for_write(&self) -> Result<(BTreeMap<String, String>, bool), StoreError> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Json(e)) => {
                warn!("Discarding unreadable store file {:?}: {}", self.path, e);
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    /// Writes next to the store file and renames it into place, so a reader
    /// never sees a half-written file.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let (mut entries, recovered) = self.load_for_write()?;
        if entries.remove(key).is_none() && !recovered {
            return Ok(());
        }
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileStore::new(dir.path(), "server-config");
        store.set("custom-server-url", "https://example.com").unwrap();
        drop(store);

        let reopened = FileStore::new(dir.path(), "server-config");
        assert_eq!(
            reopened.get("custom-server-url").unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn file_store_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let store = FileStore::new(&nested, "server-config");
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());

        store.set("anything", "x").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn namespaces_do_not_share_keys() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileStore::new(dir.path(), "server-config");
        let session = FileStore::new(dir.path(), "session");

        config.set("token", "config-value").unwrap();
        session.set("token", "session-value").unwrap();
        session.delete("token").unwrap();

        assert_eq!(config.get("token").unwrap().as_deref(), Some("config-value"));
        assert_eq!(session.get("token").unwrap(), None);
    }

    #[test]
    fn delete_on_missing_file_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "server-config");

        store.delete("custom-server-url").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn write_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "server-config");
        fs::write(store.path(), r#"{"custom-server-url": "https://half"#).unwrap();

        store.set("custom-server-url", "https://good.example.com").unwrap();
        assert_eq!(
            store.get("custom-server-url").unwrap().as_deref(),
            Some("https://good.example.com")
        );
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn delete_repairs_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "server-config");
        fs::write(store.path(), "{not json").unwrap();

        store.delete("custom-server-url").unwrap();
        assert_eq!(store.get("custom-server-url").unwrap(), None);
        assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "{}");
    }

    #[test]
    fn corrupt_file_reports_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "server-config");
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.get("k"), Err(StoreError::Json(_))));
    }
}
