//! Core traits, naming and error types for storage-backed pseudo-locks.

pub mod clock;
pub mod entry;
pub mod error;
pub mod owner;
pub mod prelude;
pub mod timeout;
pub mod traits;

pub use error::{LockError, LockResult, MalformedEntryError, StoreError, StoreResult};
pub use prelude::*;
