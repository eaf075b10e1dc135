use dashmap::DashMap;
use tracing::debug;

use crate::container::{ensure_id, Container, InFlight};
use crate::errors::{ContainerError, Result};
use crate::item::{Factory, Item};
use crate::proxy::{Make, Proxy};

/// Volatile container: items live in process memory, nothing is serialized,
/// so any item kind (including in-memory objects) can be stored.
#[derive(Default)]
pub struct InMemoryContainer {
    items: DashMap<String, Item>,
    in_flight: InFlight,
}

impl InMemoryContainer {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    fn resolve(&self, id: &str, factory: Factory) -> Result<Item> {
        let _guard = self.in_flight.enter(id)?;
        debug!(id, factory = ?factory.name(), "resolving factory");
        // No map guard is held while the factory runs; it may read other entries.
        let produced = factory.produce(self)?;

        let Some(mut entry) = self.items.get_mut(id) else {
            return Ok(produced);
        };
        let still_ours = matches!(entry.value(), Item::Factory(current) if current.ptr_eq(&factory));
        if still_ours {
            *entry = produced.clone();
            return Ok(produced);
        }
        // Another caller resolved or replaced the entry meanwhile; last write wins.
        match entry.value() {
            Item::Factory(_) => Ok(produced),
            current => Ok(current.clone()),
        }
    }
}

impl Container for InMemoryContainer {
    fn get(&self, id: &str) -> Result<Item> {
        let item = self
            .items
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ContainerError::not_found(id))?;

        match item {
            Item::Factory(factory) => self.resolve(id, factory),
            other => Ok(other),
        }
    }

    fn has(&self, id: &str) -> bool { self.items.contains_key(id) }

    fn set(&self, id: &str, item: Item) -> Result<()> {
        ensure_id(id)?;
        debug!(id, kind = item.kind(), "set");
        self.items.insert(id.to_string(), item);
        Ok(())
    }
}

impl Make for InMemoryContainer {
    fn make() -> Result<Proxy<Self>> { Ok(Proxy::new(Self::new())) }
}
