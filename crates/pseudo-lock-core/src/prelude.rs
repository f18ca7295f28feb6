//! Convenience prelude for pseudo-lock types.

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::entry::LockEntry;
pub use crate::error::{LockError, LockResult, StoreError, StoreResult};
pub use crate::owner::OwnerId;
pub use crate::timeout::Timeout;
pub use crate::traits::{LockProvider, LockProviderExt, ObjectStore, PseudoLock};
