//! Mutual exclusion for processes that share nothing but an object store.
//!
//! Cloud object stores (and shared filesystems) often offer no atomic
//! compare-and-swap, and their listings may lag behind writes. This crate
//! simulates a lock on top of three operations only: create an object,
//! delete an object, and list objects by prefix.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pseudo_lock::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = PseudoLockProvider::builder()
//!         .store(FileObjectStore::new("/mnt/shared/locks")?)
//!         .options(PseudoLockOptions::recommended())
//!         .build()?;
//!
//!     let mut lock = provider.create_lock("locks/config")?;
//!     if lock.lock(Some(Duration::from_secs(30))).await? {
//!         // Read-modify-write the shared resource
//!         lock.unlock().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # How it works
//!
//! 1. A contender creates `{prefix}_{sequence}_{owner}`.
//! 2. It waits `settling` for the store's listings to catch up.
//! 3. Every `polling` it lists `{prefix}_`, deletes entries it has seen for
//!    longer than `timeout`, and holds the lock once its own entry sorts first.
//!
//! The guarantee is only as good as the timings: `settling` must cover the
//! store's consistency window and `timeout` must exceed the longest critical
//! section. Holders are never told that they lost the lock.
//!
//! # Backends
//!
//! - [`FileObjectStore`]: one file per entry below a (shared) directory
//! - [`MemoryObjectStore`]: in-process, with a configurable listing lag
//! - Anything implementing [`ObjectStore`]
//!
//! [`StaticLockProvider`] hands out locks that always succeed, for
//! deployments with nothing to arbitrate.
//!
//! # Crate Organization
//!
//! This is a meta-crate that re-exports types from:
//! - `pseudo-lock-core`: Core traits, entry naming and errors
//! - `pseudo-lock-engine`: The lock protocol, providers and options
//! - `pseudo-lock-file`: Directory backend
//! - `pseudo-lock-memory`: In-memory backend
//!
//! For fine-grained control, you can depend on individual crates instead.

// Re-export core types and traits
pub use pseudo_lock_core::*;

pub use pseudo_lock_engine::{
    LockMarker, LockState, ObjectStoreLock, PseudoLockEngine, PseudoLockOptions,
    PseudoLockProvider, PseudoLockProviderBuilder, SequenceStrategy, StaticLockProvider,
    StaticPseudoLock,
};

pub use pseudo_lock_file::FileObjectStore;

pub use pseudo_lock_memory::{MemoryObjectStore, StoreOp};
