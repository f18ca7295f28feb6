//! In-memory object store backend for pseudo-locks.
//!
//! Useful for single-process deployments and for exercising the lock
//! protocol against a store with a controllable consistency window.

pub mod store;

pub use store::{MemoryObjectStore, StoreOp};
