use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use super::Storage;
use crate::errors::StorageError;

/// JSON file-backed string store. Backs local storage.
///
/// Persists a `key -> value` map to a JSON file and rewrites it after every
/// mutation, so entries survive process restarts.
pub struct FileStorage {
    inner: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl FileStorage {
    /// Open the store at `path`. Creates the file with an empty map if missing;
    /// a file that does not hold a JSON string map is reported as corrupt.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let map: HashMap<String, String> = match fs::read(&file_path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
                path: file_path.display().to_string(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = HashMap::new();
                write_map(&file_path, &empty)?;
                empty
            }
            Err(e) => return Err(e.into()),
        };
        debug!(path = %file_path.display(), entries = map.len(), "opened file storage");

        Ok(Self { inner: RwLock::new(map), file_path })
    }

    pub fn path(&self) -> &Path { &self.file_path }

    /// Re-read the file, picking up changes made by other processes.
    pub fn reload(&self) -> Result<(), StorageError> {
        let fresh = Self::open(&self.file_path)?;
        let map = fresh.inner.into_inner().unwrap_or_else(PoisonError::into_inner);
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = map;
        Ok(())
    }

    /// Apply a mutation to a copy, persist it, then publish it. The write lock
    /// is held throughout; on a failed write the visible map is unchanged.
    fn update<R>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> Result<R, StorageError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = map.clone();
        let out = f(&mut next);
        if let Err(e) = write_map(&self.file_path, &next) {
            warn!(path = %self.file_path.display(), error = %e, "failed to persist file storage");
            return Err(e);
        }
        *map = next;
        Ok(out)
    }
}

fn write_map(path: &Path, map: &HashMap<String, String>) -> Result<(), StorageError> {
    let sorted: BTreeMap<&String, &String> = map.iter().collect();
    let data = serde_json::to_vec_pretty(&sorted).map_err(|e| StorageError::Serialize(e.to_string()))?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        self.update(|m| m.remove(key).is_some())
    }

    fn keys(&self) -> Vec<String> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.update(HashMap::clear)
    }

    fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{prefix}_{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn file_storage_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("file_storage");
        let storage = FileStorage::open(&tmp)?;

        // initially empty
        assert_eq!(storage.len(), 0);

        storage.set_item("a", "\"1\"")?;
        storage.set_item("b", "return (f)")?;
        assert_eq!(storage.get_item("a").as_deref(), Some("\"1\""));

        // remove and reload persistence
        assert!(storage.remove_item("b")?);
        let reopened = FileStorage::open(&tmp)?;
        assert_eq!(reopened.keys(), vec!["a".to_string()]);
        assert_eq!(reopened.get_item("a").as_deref(), Some("\"1\""));

        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn reload_sees_other_writers() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("file_storage_reload");
        let first = FileStorage::open(&tmp)?;
        let second = FileStorage::open(&tmp)?;

        second.set_item("k", "1")?;
        assert!(first.get_item("k").is_none());
        first.reload()?;
        assert_eq!(first.get_item("k").as_deref(), Some("1"));

        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn corrupt_file_is_rejected() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("file_storage_corrupt");
        fs::write(&tmp, b"[1, 2, 3]")?;

        let res = FileStorage::open(&tmp);
        assert!(matches!(res, Err(StorageError::Corrupt { .. })));

        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn failed_write_leaves_entries_unchanged() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("file_storage_blocked");
        let storage = FileStorage::open(&tmp)?;
        storage.set_item("kept", "1")?;

        // a directory where the temp file goes makes every write fail
        let blocker = tmp.with_extension("tmp");
        fs::create_dir(&blocker)?;

        assert!(storage.set_item("k", "v").is_err());
        assert!(storage.get_item("k").is_none());
        assert!(storage.remove_item("kept").is_err());
        assert_eq!(storage.get_item("kept").as_deref(), Some("1"));
        assert!(storage.clear().is_err());
        assert_eq!(storage.len(), 1);

        fs::remove_dir(&blocker)?;
        storage.set_item("k", "v")?;
        assert_eq!(FileStorage::open(&tmp)?.keys(), vec!["k".to_string(), "kept".to_string()]);

        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn blank_file_is_treated_as_empty() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("file_storage_blank");
        fs::write(&tmp, b"\n")?;
        let storage = FileStorage::open(&tmp)?;
        assert!(storage.is_empty());
        storage.clear()?;
        let _ = fs::remove_file(&tmp);
        Ok(())
    }
}
