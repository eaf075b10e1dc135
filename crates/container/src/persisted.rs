//! Containers whose entries live as strings in a [`Storage`] backend.

use std::ops::Deref;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::codec;
use crate::container::{ensure_id, Container, InFlight};
use crate::errors::{ContainerError, Result};
use crate::item::Item;
use crate::proxy::{Make, Proxy};
use crate::registry::FunctionRegistry;
use crate::storage::{Environment, SharedStorage};

/// A resolved factory, remembered together with the raw text it came from.
struct Resolved {
    raw: String,
    item: Item,
}

/// Shared implementation behind the session and local containers.
///
/// Every read goes to storage, so external writes and removals are always
/// visible. Factory results are cached per container instance and dropped as
/// soon as the raw stored text changes or disappears.
pub struct StorageContainer {
    storage: SharedStorage,
    registry: Arc<FunctionRegistry>,
    resolved: DashMap<String, Resolved>,
    in_flight: InFlight,
}

impl StorageContainer {
    pub fn new(storage: SharedStorage) -> Self { Self::with_registry(storage, FunctionRegistry::global()) }

    pub fn with_registry(storage: SharedStorage, registry: Arc<FunctionRegistry>) -> Self {
        Self { storage, registry, resolved: DashMap::new(), in_flight: InFlight::default() }
    }

    /// The backing storage, for native access such as `remove_item`.
    pub fn storage(&self) -> &SharedStorage { &self.storage }

    pub fn registry(&self) -> &Arc<FunctionRegistry> { &self.registry }

    fn read_raw(&self, id: &str) -> Result<String> {
        match self.storage.get_item(id) {
            Some(raw) if !raw.is_empty() => Ok(raw),
            _ => {
                self.resolved.remove(id);
                Err(ContainerError::not_found(id))
            }
        }
    }

    fn cached(&self, id: &str, raw: &str) -> Option<Item> {
        self.resolved.get(id).filter(|hit| hit.raw == raw).map(|hit| hit.item.clone())
    }
}

impl Container for StorageContainer {
    fn get(&self, id: &str) -> Result<Item> {
        let raw = self.read_raw(id)?;
        if let Some(item) = self.cached(id, &raw) {
            trace!(id, "singleton cache hit");
            return Ok(item);
        }

        match codec::decode(id, &raw, &self.registry)? {
            Item::Factory(factory) => {
                let _guard = self.in_flight.enter(id)?;
                debug!(id, factory = ?factory.name(), "resolving factory");
                let produced = factory.produce(self)?;
                self.resolved.insert(id.to_string(), Resolved { raw, item: produced.clone() });
                Ok(produced)
            }
            other => Ok(other),
        }
    }

    fn has(&self, id: &str) -> bool {
        self.storage.get_item(id).is_some_and(|raw| !raw.is_empty())
    }

    fn set(&self, id: &str, item: Item) -> Result<()> {
        ensure_id(id)?;
        let raw = codec::encode(id, &item, &self.registry)?;
        self.storage.set_item(id, &raw)?;
        self.resolved.remove(id);
        debug!(id, kind = item.kind(), bytes = raw.len(), "set");
        Ok(())
    }
}

/// Container backed by the environment's session storage.
pub struct SessionStorageContainer(StorageContainer);

impl SessionStorageContainer {
    pub const UNAVAILABLE: &'static str = "Session storage is not available";

    /// Fails fast when the global environment has no session storage.
    pub fn new() -> Result<Self> { Self::with_environment(Environment::global()) }

    pub fn with_environment(env: &Environment) -> Result<Self> {
        let storage = env.session_storage().ok_or(ContainerError::Unavailable(Self::UNAVAILABLE))?;
        Ok(Self(StorageContainer::new(storage)))
    }

    pub fn with_registry(env: &Environment, registry: Arc<FunctionRegistry>) -> Result<Self> {
        let storage = env.session_storage().ok_or(ContainerError::Unavailable(Self::UNAVAILABLE))?;
        Ok(Self(StorageContainer::with_registry(storage, registry)))
    }
}

/// Container backed by the environment's local storage.
pub struct LocalStorageContainer(StorageContainer);

impl LocalStorageContainer {
    pub const UNAVAILABLE: &'static str = "Local storage is not available";

    /// Fails fast when the global environment has no local storage.
    pub fn new() -> Result<Self> { Self::with_environment(Environment::global()) }

    pub fn with_environment(env: &Environment) -> Result<Self> {
        let storage = env.local_storage().ok_or(ContainerError::Unavailable(Self::UNAVAILABLE))?;
        Ok(Self(StorageContainer::new(storage)))
    }

    pub fn with_registry(env: &Environment, registry: Arc<FunctionRegistry>) -> Result<Self> {
        let storage = env.local_storage().ok_or(ContainerError::Unavailable(Self::UNAVAILABLE))?;
        Ok(Self(StorageContainer::with_registry(storage, registry)))
    }
}

impl Deref for SessionStorageContainer {
    type Target = StorageContainer;
    fn deref(&self) -> &StorageContainer { &self.0 }
}

impl Deref for LocalStorageContainer {
    type Target = StorageContainer;
    fn deref(&self) -> &StorageContainer { &self.0 }
}

impl Container for SessionStorageContainer {
    fn get(&self, id: &str) -> Result<Item> { self.0.get(id) }
    fn has(&self, id: &str) -> bool { self.0.has(id) }
    fn set(&self, id: &str, item: Item) -> Result<()> { self.0.set(id, item) }
}

impl Container for LocalStorageContainer {
    fn get(&self, id: &str) -> Result<Item> { self.0.get(id) }
    fn has(&self, id: &str) -> bool { self.0.has(id) }
    fn set(&self, id: &str, item: Item) -> Result<()> { self.0.set(id, item) }
}

impl Make for SessionStorageContainer {
    fn make() -> Result<Proxy<Self>> { Self::new().map(Proxy::new) }
}

impl Make for LocalStorageContainer {
    fn make() -> Result<Proxy<Self>> { Self::new().map(Proxy::new) }
}
