//! Wiring from [`configs::AppConfig`] to a ready container.

use std::sync::Arc;

use configs::{AppConfig, Backend};
use tracing::info;

use crate::container::Container;
use crate::errors::Result;
use crate::memory::InMemoryContainer;
use crate::persisted::{LocalStorageContainer, SessionStorageContainer};
use crate::storage::{Environment, FileStorage};

/// Install the configured local storage into the global environment and
/// build the configured container.
pub fn bootstrap(cfg: &AppConfig) -> anyhow::Result<Box<dyn Container>> {
    bootstrap_environment(cfg, Environment::global())
}

/// Same as [`bootstrap`] against an explicit environment.
pub fn bootstrap_environment(cfg: &AppConfig, env: &Environment) -> anyhow::Result<Box<dyn Container>> {
    let path = common::env::ensure_data_dir(&cfg.storage.data_dir, &cfg.storage.local_file)?;
    let storage = FileStorage::open(&path)?;
    info!(path = %path.display(), "local storage opened");
    env.install_local_storage(Arc::new(storage));

    let container = build(cfg.storage.backend, env)?;
    info!(backend = ?cfg.storage.backend, "container ready");
    Ok(container)
}

pub fn build(backend: Backend, env: &Environment) -> Result<Box<dyn Container>> {
    Ok(match backend {
        Backend::Memory => Box::new(InMemoryContainer::new()),
        Backend::Session => Box::new(SessionStorageContainer::with_environment(env)?),
        Backend::Local => Box::new(LocalStorageContainer::with_environment(env)?),
    })
}
