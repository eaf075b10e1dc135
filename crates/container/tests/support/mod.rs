#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use container::{
    Container, Environment, FileStorage, Function, InMemoryContainer, LocalStorageContainer, MemoryStorage,
    SessionStorageContainer, SharedStorage,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// An isolated environment whose local storage is a fresh JSON file.
pub struct Sandbox {
    pub env: Environment,
    pub local: SharedStorage,
    pub session: SharedStorage,
    pub file: PathBuf,
}

impl Sandbox {
    pub fn new() -> Result<Self, anyhow::Error> {
        let file = std::env::temp_dir().join(format!("container_it_{}.json", uuid::Uuid::new_v4()));
        let local: SharedStorage = Arc::new(FileStorage::open(&file)?);
        let session: SharedStorage = Arc::new(MemoryStorage::new());
        let env = Environment::new(Some(Arc::clone(&local)), Some(Arc::clone(&session)));
        Ok(Self { env, local, session, file })
    }

    /// One container per strategy, labelled for assertion messages.
    pub fn containers(&self) -> Result<Vec<(&'static str, Box<dyn Container>)>, anyhow::Error> {
        Ok(vec![
            ("InMemoryContainer", Box::new(InMemoryContainer::new()) as Box<dyn Container>),
            ("SessionStorageContainer", Box::new(SessionStorageContainer::with_environment(&self.env)?) as Box<dyn Container>),
            ("LocalStorageContainer", Box::new(LocalStorageContainer::with_environment(&self.env)?) as Box<dyn Container>),
        ])
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.file);
    }
}

pub fn random_key() -> String { rand::random::<f64>().to_string() }

// The global registry accepts one closure per name, so every test shares this one.
static ADD: Lazy<Function> = Lazy::new(|| {
    Function::named("math.add", |args: &[Value]| {
        let a = args.first().and_then(Value::as_f64).unwrap_or_default();
        let b = args.get(1).and_then(Value::as_f64).unwrap_or_default();
        Ok(json!(a + b))
    })
});

pub fn add() -> Function { ADD.clone() }
