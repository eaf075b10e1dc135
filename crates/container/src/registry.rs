use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::errors::{ContainerError, Result};
use crate::item::{Factory, Function, Item};

static GLOBAL: Lazy<Arc<FunctionRegistry>> = Lazy::new(|| Arc::new(FunctionRegistry::new()));

/// Name to callable table used to rebuild functions and factories read back
/// from string storage. Only callables registered here can come back out of
/// a persisted store; nothing in storage is ever executed as code.
#[derive(Default)]
pub struct FunctionRegistry {
    callables: DashMap<String, Item>,
}

impl FunctionRegistry {
    pub fn new() -> Self { Self::default() }

    /// Process-wide registry shared by persisted containers built without an explicit one.
    pub fn global() -> Arc<Self> { Arc::clone(&GLOBAL) }

    /// Registering the same closure again is a no-op; a different callable
    /// under a taken name fails with [`ContainerError::CallableConflict`].
    pub fn register_function(&self, function: Function) -> Result<()> {
        let name = registrable_name(function.name())?;
        self.insert(name, Item::Function(function))
    }

    pub fn register_factory(&self, factory: Factory) -> Result<()> {
        let name = registrable_name(factory.name())?;
        self.insert(name, Item::Factory(factory))
    }

    fn insert(&self, name: String, callable: Item) -> Result<()> {
        match self.callables.entry(name) {
            Entry::Occupied(existing) if existing.get().same_instance(&callable) => Ok(()),
            Entry::Occupied(existing) => Err(ContainerError::CallableConflict { name: existing.key().clone() }),
            Entry::Vacant(slot) => {
                debug!(name = %slot.key(), kind = callable.kind(), "registered callable");
                slot.insert(callable);
                Ok(())
            }
        }
    }

    /// Returns the registered callable as an [`Item::Function`] or [`Item::Factory`].
    pub fn resolve(&self, name: &str) -> Option<Item> {
        self.callables.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool { self.callables.contains_key(name) }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.callables.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize { self.callables.len() }

    pub fn is_empty(&self) -> bool { self.callables.is_empty() }
}

fn registrable_name(name: Option<&str>) -> Result<String> {
    match name {
        Some(n) if !n.trim().is_empty() => Ok(n.to_string()),
        Some(_) => Err(ContainerError::InvalidIdentifier("callable name must not be blank".into())),
        None => Err(ContainerError::InvalidIdentifier("anonymous callables cannot be registered".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn register_and_resolve() -> Result<()> {
        let registry = FunctionRegistry::new();
        registry.register_function(Function::named("double", |args| {
            let x = args.first().and_then(Value::as_i64).unwrap_or_default();
            Ok(json!(x * 2))
        }))?;
        registry.register_factory(Factory::named("make.unit", |_| Ok(Item::Value(Value::Null))))?;

        assert_eq!(registry.names(), vec!["double".to_string(), "make.unit".to_string()]);
        let Some(Item::Function(double)) = registry.resolve("double") else {
            panic!("double should resolve to a function");
        };
        assert_eq!(double.call(&[json!(21)])?, json!(42));
        assert!(matches!(registry.resolve("make.unit"), Some(Item::Factory(_))));
        assert!(registry.resolve("missing").is_none());
        Ok(())
    }

    #[test]
    fn anonymous_and_blank_names_are_rejected() {
        let registry = FunctionRegistry::new();
        assert!(registry.register_function(Function::new(|_| Ok(Value::Null))).is_err());
        assert!(registry.register_function(Function::named("  ", |_| Ok(Value::Null))).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn taken_name_keeps_first_callable() -> Result<()> {
        let registry = FunctionRegistry::new();
        let first = Function::named("f", |_| Ok(json!(1)));
        registry.register_function(first.clone())?;
        // same closure again is accepted
        registry.register_function(first)?;

        let err = registry.register_function(Function::named("f", |_| Ok(json!(2)))).err();
        assert!(matches!(err, Some(ContainerError::CallableConflict { .. })));
        let err = registry.register_factory(Factory::named("f", |_| Ok(Item::Value(Value::Null)))).err();
        assert!(matches!(err, Some(ContainerError::CallableConflict { .. })));

        assert_eq!(registry.len(), 1);
        let f = registry.resolve("f").and_then(|i| i.as_function().cloned());
        assert_eq!(f.map(|f| f.call(&[])).transpose()?, Some(json!(1)));
        Ok(())
    }
}
