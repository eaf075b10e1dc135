//! String-only storage backends used by the persisted containers.
//!
//! The surface mirrors Web Storage: one string value per string key, with
//! native removal. Containers never remove entries themselves.

pub mod environment;
pub mod file;
pub mod memory;

use std::sync::Arc;

use crate::errors::StorageError;

/// Trait abstraction for a key-string to string-value store.
/// Implementations can be in-memory, file-backed, or remote.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removes `key`; returns whether an entry existed.
    fn remove_item(&self, key: &str) -> Result<bool, StorageError>;
    /// All keys, sorted.
    fn keys(&self) -> Vec<String>;
    fn clear(&self) -> Result<(), StorageError>;

    fn len(&self) -> usize { self.keys().len() }

    fn is_empty(&self) -> bool { self.len() == 0 }
}

pub type SharedStorage = Arc<dyn Storage>;

pub use environment::Environment;
pub use file::FileStorage;
pub use memory::MemoryStorage;
