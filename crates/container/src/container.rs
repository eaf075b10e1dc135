use std::any::Any;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use dashmap::DashSet;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{ContainerError, Result};
use crate::item::{Factory, Function, Item};

/// Key/value registry for services and values.
///
/// Factories stored with `set` are resolved lazily: the first `get` runs the
/// factory with the container itself and every later `get` returns that same
/// result until the entry is overwritten.
pub trait Container: Send + Sync {
    /// Fails with [`ContainerError::NotFound`] when `id` is absent.
    fn get(&self, id: &str) -> Result<Item>;

    fn has(&self, id: &str) -> bool;

    fn set(&self, id: &str, item: Item) -> Result<()>;
}

/// Typed helpers available on every container, including `dyn Container`.
pub trait ContainerExt: Container {
    fn set_value<T: Serialize + ?Sized>(&self, id: &str, value: &T) -> Result<()> {
        let item = Item::from_serialize(value)
            .map_err(|e| ContainerError::Encode { id: id.to_string(), reason: e.to_string() })?;
        self.set(id, item)
    }

    fn set_function(&self, id: &str, function: Function) -> Result<()> { self.set(id, Item::Function(function)) }

    fn set_factory(&self, id: &str, factory: Factory) -> Result<()> { self.set(id, Item::Factory(factory)) }

    fn get_as<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        match self.get(id)? {
            Item::Value(value) => serde_json::from_value(value)
                .map_err(|e| ContainerError::Decode { id: id.to_string(), reason: e.to_string() }),
            _ => Err(ContainerError::mismatch(id, "value")),
        }
    }

    fn get_object<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
        self.get(id)?.downcast::<T>().ok_or_else(|| ContainerError::mismatch(id, std::any::type_name::<T>()))
    }

    fn get_function(&self, id: &str) -> Result<Function> {
        match self.get(id)? {
            Item::Function(function) => Ok(function),
            _ => Err(ContainerError::mismatch(id, "function")),
        }
    }
}

impl<C: Container + ?Sized> ContainerExt for C {}

pub(crate) fn ensure_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(ContainerError::InvalidIdentifier("identifier must not be empty".into()));
    }
    Ok(())
}

/// Factories currently being resolved, per thread. A factory that asks for
/// its own id (directly or through other factories) hits an entry here.
#[derive(Default)]
pub(crate) struct InFlight {
    active: DashSet<(ThreadId, String)>,
}

impl InFlight {
    pub(crate) fn enter(&self, id: &str) -> Result<InFlightGuard<'_>> {
        let key = (thread::current().id(), id.to_string());
        if !self.active.insert(key.clone()) {
            return Err(ContainerError::CircularDependency(id.to_string()));
        }
        Ok(InFlightGuard { owner: self, key })
    }
}

pub(crate) struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: (ThreadId, String),
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.active.remove(&self.key);
    }
}
