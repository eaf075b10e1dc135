//! Minimal dependency-injection container.
//!
//! A [`Container`] maps string ids to [`Item`]s. Three strategies share the
//! same contract:
//! - [`InMemoryContainer`]: volatile, holds any item kind without serialization.
//! - [`SessionStorageContainer`]: entries serialized into the environment's session storage.
//! - [`LocalStorageContainer`]: entries serialized into the environment's local storage,
//!   a JSON file once [`bootstrap`] has run.
//!
//! Factories are resolved lazily and cached, so repeated reads of a factory
//! entry return the same instance.

pub mod bootstrap;
pub mod codec;
pub mod container;
pub mod errors;
pub mod item;
pub mod memory;
pub mod persisted;
pub mod proxy;
pub mod registry;
pub mod storage;

pub use bootstrap::bootstrap;
pub use container::{Container, ContainerExt};
pub use errors::{ContainerError, Result, StorageError};
pub use item::{Factory, Function, Item};
pub use memory::InMemoryContainer;
pub use persisted::{LocalStorageContainer, SessionStorageContainer, StorageContainer};
pub use proxy::{Make, Property, Proxy};
pub use registry::FunctionRegistry;
pub use storage::{Environment, FileStorage, MemoryStorage, SharedStorage, Storage};
