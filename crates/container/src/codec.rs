//! Conversion between [`Item`]s and the single string stored per key.
//!
//! Wire format:
//! - plain values: JSON text, so a string `abc` is stored as `"abc"`
//! - named functions and factories: `return (<name>)`
//!
//! Callables are rebuilt through a [`FunctionRegistry`] lookup, never by
//! evaluating stored text.

use serde_json::Value;

use crate::errors::{ContainerError, Result};
use crate::item::Item;
use crate::registry::FunctionRegistry;

pub const CALLABLE_PREFIX: &str = "return (";
pub const CALLABLE_SUFFIX: &str = ")";

/// Serialize `item` for storage under `id`. Named callables are registered in
/// `registry` so that a later [`decode`] can find them.
pub fn encode(id: &str, item: &Item, registry: &FunctionRegistry) -> Result<String> {
    match item {
        Item::Value(value) => serde_json::to_string(value).map_err(|e| encode_error(id, e.to_string())),
        Item::Function(function) => {
            let name = callable_name(id, function.name())?;
            registry.register_function(function.clone())?;
            Ok(callable_reference(name))
        }
        Item::Factory(factory) => {
            let name = callable_name(id, factory.name())?;
            registry.register_factory(factory.clone())?;
            Ok(callable_reference(name))
        }
        Item::Object(_) => Err(encode_error(id, "in-memory objects cannot be persisted".into())),
    }
}

/// Rebuild the item stored under `id` from its raw text.
pub fn decode(id: &str, raw: &str, registry: &FunctionRegistry) -> Result<Item> {
    if let Some(rest) = raw.strip_prefix(CALLABLE_PREFIX) {
        let name = rest.strip_suffix(CALLABLE_SUFFIX).ok_or_else(|| ContainerError::Decode {
            id: id.to_string(),
            reason: "unterminated callable reference".into(),
        })?;
        return registry
            .resolve(name)
            .ok_or_else(|| ContainerError::UnknownFunction { name: name.to_string() });
    }

    serde_json::from_str::<Value>(raw)
        .map(Item::Value)
        .map_err(|e| ContainerError::Decode { id: id.to_string(), reason: e.to_string() })
}

fn callable_reference(name: &str) -> String { format!("{CALLABLE_PREFIX}{name}{CALLABLE_SUFFIX}") }

fn callable_name<'a>(id: &str, name: Option<&'a str>) -> Result<&'a str> {
    match name {
        Some(n) if !n.trim().is_empty() => Ok(n),
        _ => Err(encode_error(id, "only named callables can be persisted".into())),
    }
}

fn encode_error(id: &str, reason: String) -> ContainerError {
    ContainerError::Encode { id: id.to_string(), reason }
}
