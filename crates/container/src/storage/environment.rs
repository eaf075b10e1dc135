use std::sync::Arc;

use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use tracing::info;

use super::{MemoryStorage, SharedStorage};

static GLOBAL: Lazy<Environment> =
    Lazy::new(|| Environment::new(None, Some(Arc::new(MemoryStorage::new()) as SharedStorage)));

/// The storage facilities available to the process.
///
/// Each slot is either installed or absent; persisted containers read their
/// slot once at construction and fail when it is absent.
pub struct Environment {
    local: ArcSwapOption<SharedStorage>,
    session: ArcSwapOption<SharedStorage>,
}

impl Environment {
    pub fn new(local: Option<SharedStorage>, session: Option<SharedStorage>) -> Self {
        Self { local: ArcSwapOption::from(local.map(Arc::new)), session: ArcSwapOption::from(session.map(Arc::new)) }
    }

    pub fn empty() -> Self { Self::new(None, None) }

    /// Process-wide environment. Session storage is an in-memory store that
    /// lives as long as the process; local storage is absent until
    /// [`bootstrap`](crate::bootstrap::bootstrap) or an explicit install.
    pub fn global() -> &'static Environment { &GLOBAL }

    pub fn local_storage(&self) -> Option<SharedStorage> {
        self.local.load_full().map(|s| Arc::clone(&*s))
    }

    pub fn session_storage(&self) -> Option<SharedStorage> {
        self.session.load_full().map(|s| Arc::clone(&*s))
    }

    /// Install `storage` as local storage; returns the previous one.
    pub fn install_local_storage(&self, storage: SharedStorage) -> Option<SharedStorage> {
        info!(slot = "local", "storage installed");
        self.local.swap(Some(Arc::new(storage))).map(|prev| Arc::clone(&*prev))
    }

    pub fn install_session_storage(&self, storage: SharedStorage) -> Option<SharedStorage> {
        info!(slot = "session", "storage installed");
        self.session.swap(Some(Arc::new(storage))).map(|prev| Arc::clone(&*prev))
    }

    /// Remove local storage, making it unavailable to new containers.
    pub fn take_local_storage(&self) -> Option<SharedStorage> {
        self.local.swap(None).map(|prev| Arc::clone(&*prev))
    }

    pub fn take_session_storage(&self) -> Option<SharedStorage> {
        self.session.swap(None).map(|prev| Arc::clone(&*prev))
    }
}
