//! Lock for deployments without shared storage.
//!
//! A single supervisor with a static configuration has nothing to arbitrate,
//! so acquiring always succeeds at once and nothing is written anywhere.

use pseudo_lock_core::error::{LockError, LockResult};
use pseudo_lock_core::timeout::Timeout;
use pseudo_lock_core::traits::{LockProvider, PseudoLock};
use tracing::trace;

/// Provider of [`StaticPseudoLock`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLockProvider;

impl StaticLockProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LockProvider for StaticLockProvider {
    type Lock = StaticPseudoLock;

    fn create_lock(&self, prefix: &str) -> LockResult<Self::Lock> {
        Ok(StaticPseudoLock::new(prefix))
    }
}

/// Pseudo-lock that is always immediately available.
#[derive(Debug, Clone)]
pub struct StaticPseudoLock {
    prefix: String,
    held: bool,
}

impl StaticPseudoLock {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            held: false,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl PseudoLock for StaticPseudoLock {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn lock(&mut self, _max_wait: Timeout) -> LockResult<bool> {
        if self.held {
            return Err(LockError::AlreadyLocked(self.prefix.clone()));
        }
        trace!(lock.prefix = %self.prefix, "static lock acquired");
        self.held = true;
        Ok(true)
    }

    async fn unlock(&mut self) -> LockResult<()> {
        if !self.held {
            return Err(LockError::NotLocked(self.prefix.clone()));
        }
        self.held = false;
        Ok(())
    }
}
