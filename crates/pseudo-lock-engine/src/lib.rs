//! Pseudo-lock protocol over stores that can only create, list and delete.
//!
//! See [`PseudoLockEngine`] for the protocol and [`PseudoLockProvider`] for
//! the usual entry point.

pub mod engine;
pub mod lock;
pub mod marker;
mod observations;
pub mod options;
pub mod provider;
pub mod sequence;
pub mod static_lock;

pub use engine::{LockState, PseudoLockEngine};
pub use lock::ObjectStoreLock;
pub use marker::LockMarker;
pub use options::PseudoLockOptions;
pub use provider::{PseudoLockProvider, PseudoLockProviderBuilder};
pub use sequence::{SequenceGenerator, SequenceStrategy};
pub use static_lock::{StaticLockProvider, StaticPseudoLock};
