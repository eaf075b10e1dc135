//! Values a container can hold.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::container::Container;
use crate::errors::Result;

type FunctionFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;
type FactoryFn = dyn Fn(&dyn Container) -> Result<Item> + Send + Sync;

/// A callable entry. Takes positional JSON arguments and returns a JSON value.
///
/// Only named functions can be written to a persisted store; the name is what
/// ends up in storage and what the [`FunctionRegistry`](crate::FunctionRegistry)
/// resolves on the way back.
#[derive(Clone)]
pub struct Function {
    name: Option<Arc<str>>,
    inner: Arc<FunctionFn>,
}

impl Function {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self { name: None, inner: Arc::new(f) }
    }

    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self { name: Some(Arc::from(name.into())), inner: Arc::new(f) }
    }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    pub fn call(&self, args: &[Value]) -> Result<Value> { (self.inner)(args) }

    /// Whether both handles point at the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.inner, &other.inner) }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A producer that builds an entry's real value from the container itself.
///
/// Factories are resolved lazily: the first `get` runs the producer and every
/// later `get` returns the cached result.
#[derive(Clone)]
pub struct Factory {
    name: Option<Arc<str>>,
    inner: Arc<FactoryFn>,
}

impl Factory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Container) -> Result<Item> + Send + Sync + 'static,
    {
        Self { name: None, inner: Arc::new(f) }
    }

    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn Container) -> Result<Item> + Send + Sync + 'static,
    {
        Self { name: Some(Arc::from(name.into())), inner: Arc::new(f) }
    }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    pub fn produce(&self, container: &dyn Container) -> Result<Item> { (self.inner)(container) }

    pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.inner, &other.inner) }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").field("name", &self.name).finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub enum Item {
    /// Plain structured data.
    Value(Value),
    /// In-memory-only data such as a built service instance.
    Object(Arc<dyn Any + Send + Sync>),
    Function(Function),
    Factory(Factory),
}

impl Item {
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Item::Value)
    }

    pub fn object<T: Any + Send + Sync>(value: T) -> Self { Item::Object(Arc::new(value)) }

    pub fn kind(&self) -> &'static str {
        match self {
            Item::Value(_) => "value",
            Item::Object(_) => "object",
            Item::Function(_) => "function",
            Item::Factory(_) => "factory",
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Item::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Item::Object(obj) => Arc::clone(obj).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Identity for shared items, equality for plain values.
    pub fn same_instance(&self, other: &Item) -> bool {
        match (self, other) {
            (Item::Value(a), Item::Value(b)) => a == b,
            (Item::Object(a), Item::Object(b)) => Arc::ptr_eq(a, b),
            (Item::Function(a), Item::Function(b)) => a.ptr_eq(b),
            (Item::Factory(a), Item::Factory(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Item::Object(_) => f.write_str("Object(..)"),
            Item::Function(func) => func.fmt(f),
            Item::Factory(factory) => factory.fmt(f),
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self { Item::Value(value) }
}

impl From<Function> for Item {
    fn from(value: Function) -> Self { Item::Function(value) }
}

impl From<Factory> for Item {
    fn from(value: Factory) -> Self { Item::Factory(value) }
}
