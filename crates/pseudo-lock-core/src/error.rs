//! Error types for pseudo-lock operations.

use thiserror::Error;

/// Errors reported by an [`ObjectStore`](crate::traits::ObjectStore) adapter.
///
/// "Object not found" is never an error: adapters report a delete of a
/// missing object as success.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the operation (credentials, permissions).
    #[error("store denied the operation: {0}")]
    Denied(String),

    /// The object name cannot be represented by this backend.
    #[error("invalid object name: {0}")]
    InvalidName(String),

    /// Local I/O failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific error.
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for object store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// An object name under a lock prefix that does not have the shape of a
/// lock entry.
///
/// The store namespace may be shared, so the engine skips such names instead
/// of surfacing this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed lock entry '{name}': {reason}")]
pub struct MalformedEntryError {
    /// The offending object name.
    pub name: String,
    /// Why it failed to parse.
    pub reason: &'static str,
}

impl MalformedEntryError {
    pub(crate) fn new(name: &str, reason: &'static str) -> Self {
        Self {
            name: name.to_string(),
            reason,
        }
    }
}

/// Errors that can occur during lock operations.
///
/// Running out of patience in `lock()` is not an error; it is reported as
/// `Ok(false)`.
#[derive(Error, Debug)]
pub enum LockError {
    /// The object store failed; the attempt was aborted.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Lock operation was cancelled.
    #[error("lock operation was cancelled")]
    Cancelled,

    /// `lock()` was called while this lock is already held.
    #[error("lock '{0}' is already held by this instance")]
    AlreadyLocked(String),

    /// `unlock()` was called while this lock is not held.
    #[error("lock '{0}' is not held by this instance")]
    NotLocked(String),

    /// Invalid lock prefix or owner id.
    #[error("invalid lock name: {0}")]
    InvalidName(String),

    /// Invalid timing configuration.
    #[error("invalid lock configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;
