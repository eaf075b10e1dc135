use dashmap::DashMap;

use super::Storage;
use crate::errors::StorageError;

/// Process-lifetime string store. Backs session storage: every container
/// pointing at the same instance sees the same entries until the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    inner: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|v| v.value().clone())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.inner.remove(key).is_some())
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear();
        Ok(())
    }

    fn len(&self) -> usize { self.inner.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_basic_crud() -> Result<(), anyhow::Error> {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.set_item("b", "2")?;
        storage.set_item("a", "1")?;
        assert_eq!(storage.get_item("a").as_deref(), Some("1"));
        assert_eq!(storage.keys(), vec!["a".to_string(), "b".to_string()]);

        assert!(storage.remove_item("a")?);
        assert!(!storage.remove_item("a")?);
        assert_eq!(storage.len(), 1);

        storage.clear()?;
        assert!(storage.get_item("b").is_none());
        Ok(())
    }
}
