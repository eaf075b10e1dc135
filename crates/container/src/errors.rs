use thiserror::Error;

/// Failures raised by a [`Storage`](crate::storage::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("storage serialization error: {0}")]
    Serialize(String),
}

/// Every failure a container can report.
///
/// `NotFound` is the expected "no such entry" signal. All other variants
/// are container failures and are always surfaced to the caller.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("no entry found for identifier `{0}`")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(&'static str),
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("cannot encode `{id}`: {reason}")]
    Encode { id: String, reason: String },
    #[error("cannot decode `{id}`: {reason}")]
    Decode { id: String, reason: String },
    #[error("stored callable `{name}` is not registered")]
    UnknownFunction { name: String },
    #[error("a different callable is already registered as `{name}`")]
    CallableConflict { name: String },
    #[error("circular dependency while resolving `{0}`")]
    CircularDependency(String),
    #[error("entry `{id}` is not a {expected}")]
    TypeMismatch { id: String, expected: &'static str },
    #[error("function call failed: {0}")]
    Function(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ContainerError {
    pub fn not_found(id: &str) -> Self { Self::NotFound(id.to_string()) }

    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }

    pub fn mismatch(id: &str, expected: &'static str) -> Self {
        Self::TypeMismatch { id: id.to_string(), expected }
    }
}

pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
