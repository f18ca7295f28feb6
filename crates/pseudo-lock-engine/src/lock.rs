//! Pseudo-lock facade over an object store.

use pseudo_lock_core::clock::{Clock, SystemClock};
use pseudo_lock_core::error::LockResult;
use pseudo_lock_core::owner::OwnerId;
use pseudo_lock_core::timeout::Timeout;
use pseudo_lock_core::traits::{ObjectStore, PseudoLock};
use tokio::sync::watch;

use crate::engine::{LockState, PseudoLockEngine};
use crate::options::PseudoLockOptions;

/// A pseudo-lock backed by any [`ObjectStore`].
///
/// # Example
///
/// ```rust,ignore
/// let mut lock = ObjectStoreLock::new(
///     store,
///     "locks/config",
///     OwnerId::generate(),
///     PseudoLockOptions::recommended(),
/// )?;
///
/// if lock.lock(Some(Duration::from_secs(30))).await? {
///     // read-modify-write the shared config
///     lock.unlock().await?;
/// }
/// ```
pub struct ObjectStoreLock<S, C = SystemClock> {
    engine: PseudoLockEngine<S, C>,
}

impl<S: ObjectStore> ObjectStoreLock<S, SystemClock> {
    /// Creates a lock for `prefix` owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is invalid or the options are
    /// inconsistent.
    pub fn new(
        store: S,
        prefix: impl Into<String>,
        owner: OwnerId,
        options: PseudoLockOptions,
    ) -> LockResult<Self> {
        Ok(Self::from_engine(PseudoLockEngine::new(
            store, prefix, owner, options,
        )?))
    }
}

impl<S: ObjectStore, C: Clock> ObjectStoreLock<S, C> {
    pub fn from_engine(engine: PseudoLockEngine<S, C>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &PseudoLockEngine<S, C> {
        &self.engine
    }

    pub fn owner(&self) -> &OwnerId {
        self.engine.owner()
    }

    pub fn state(&self) -> LockState {
        self.engine.state()
    }

    /// Returns `true` while the lock is held.
    pub fn is_held(&self) -> bool {
        self.engine.state() == LockState::Held
    }

    /// Name of the entry this lock currently has in the store.
    pub fn entry_name(&self) -> Option<&str> {
        self.engine.entry_name()
    }

    /// Like [`PseudoLock::lock`], but gives up with
    /// [`LockError::Cancelled`](pseudo_lock_core::error::LockError::Cancelled)
    /// as soon as `cancel` becomes `true`.
    pub async fn lock_with_cancel(
        &mut self,
        max_wait: Timeout,
        cancel: watch::Receiver<bool>,
    ) -> LockResult<bool> {
        self.engine.lock(max_wait, Some(cancel)).await
    }
}

impl<S: ObjectStore, C: Clock> PseudoLock for ObjectStoreLock<S, C> {
    fn prefix(&self) -> &str {
        self.engine.prefix()
    }

    async fn lock(&mut self, max_wait: Timeout) -> LockResult<bool> {
        self.engine.lock(max_wait, None).await
    }

    async fn unlock(&mut self) -> LockResult<()> {
        self.engine.unlock().await
    }
}
