//! Property-style access over any container.
//!
//! `proxy.property("foo").get()` is an alias for `get("foo")` and
//! `proxy.property("foo").set(v)` for `set("foo", v)`. Methods declared on the
//! wrapped container stay reachable through `Deref` and are never intercepted.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::container::{Container, ContainerExt};
use crate::errors::Result;
use crate::item::Item;

pub struct Proxy<C> {
    inner: C,
}

impl<C: Container> Proxy<C> {
    pub fn new(inner: C) -> Self { Self { inner } }

    pub fn into_inner(self) -> C { self.inner }

    pub fn property<'a>(&'a self, name: &'a str) -> Property<'a, C> {
        Property { container: &self.inner, name }
    }
}

impl<C> Deref for Proxy<C> {
    type Target = C;
    fn deref(&self) -> &C { &self.inner }
}

impl<C: Container> Container for Proxy<C> {
    fn get(&self, id: &str) -> Result<Item> { self.inner.get(id) }
    fn has(&self, id: &str) -> bool { self.inner.has(id) }
    fn set(&self, id: &str, item: Item) -> Result<()> { self.inner.set(id, item) }
}

/// A named entry of a proxied container.
pub struct Property<'a, C: ?Sized> {
    container: &'a C,
    name: &'a str,
}

impl<C: Container + ?Sized> Property<'_, C> {
    pub fn name(&self) -> &str { self.name }

    pub fn get(&self) -> Result<Item> { self.container.get(self.name) }

    pub fn get_as<T: DeserializeOwned>(&self) -> Result<T> { self.container.get_as(self.name) }

    pub fn set(&self, item: impl Into<Item>) -> Result<()> { self.container.set(self.name, item.into()) }

    pub fn set_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.container.set_value(self.name, value)
    }

    pub fn exists(&self) -> bool { self.container.has(self.name) }
}

/// Static constructor returning a container wrapped in a [`Proxy`].
pub trait Make: Container + Sized {
    fn make() -> Result<Proxy<Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryContainer;
    use serde_json::json;

    #[test]
    fn property_aliases_get_and_set() -> Result<()> {
        let proxy = InMemoryContainer::make()?;
        proxy.property("foo").set_value("bar")?;

        assert!(proxy.has("foo"));
        assert!(proxy.property("foo").exists());
        assert_eq!(proxy.property("foo").get_as::<String>()?, "bar");
        assert_eq!(proxy.get("foo")?.as_value(), Some(&json!("bar")));

        proxy.set("foo", Item::Value(json!(3)))?;
        assert_eq!(proxy.property("foo").get_as::<i64>()?, 3);
        Ok(())
    }

    #[test]
    fn declared_methods_are_not_intercepted() -> Result<()> {
        let proxy = InMemoryContainer::make()?;
        proxy.property("len").set(json!("shadow"))?;
        // `len` is the container's own method, not the entry
        assert_eq!(proxy.len(), 1);
        assert!(proxy.property("missing").get().is_err_and(|e| e.is_not_found()));
        Ok(())
    }
}
