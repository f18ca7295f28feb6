//! Pseudo-lock provider implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use pseudo_lock_core::clock::{Clock, SystemClock};
use pseudo_lock_core::entry::validate_prefix;
use pseudo_lock_core::error::{LockError, LockResult};
use pseudo_lock_core::owner::OwnerId;
use pseudo_lock_core::traits::{LockProvider, ObjectStore};

use crate::engine::PseudoLockEngine;
use crate::lock::ObjectStoreLock;
use crate::options::PseudoLockOptions;
use crate::sequence::SequenceStrategy;

/// Builder for pseudo-lock provider configuration.
pub struct PseudoLockProviderBuilder<S, C = SystemClock> {
    store: Option<S>,
    options: Option<PseudoLockOptions>,
    owner: Option<OwnerId>,
    clock: C,
    sequence_strategy: SequenceStrategy,
}

impl<S> PseudoLockProviderBuilder<S, SystemClock> {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            store: None,
            options: None,
            owner: None,
            clock: SystemClock,
            sequence_strategy: SequenceStrategy::default(),
        }
    }
}

impl<S> Default for PseudoLockProviderBuilder<S, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C> PseudoLockProviderBuilder<S, C> {
    /// Sets the store every lock is simulated on.
    pub fn store(mut self, store: S) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the timings. Required; there is no implicit default.
    pub fn options(mut self, options: PseudoLockOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the instance token. A random one is generated otherwise.
    pub fn owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn sequence_strategy(mut self, strategy: SequenceStrategy) -> Self {
        self.sequence_strategy = strategy;
        self
    }

    /// Replaces the clock handed to every lock.
    pub fn clock<C2: Clock>(self, clock: C2) -> PseudoLockProviderBuilder<S, C2> {
        PseudoLockProviderBuilder {
            store: self.store,
            options: self.options,
            owner: self.owner,
            clock,
            sequence_strategy: self.sequence_strategy,
        }
    }
}

impl<S: ObjectStore + Clone, C: Clock> PseudoLockProviderBuilder<S, C> {
    /// Builds the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or the options are missing, or if the
    /// options are inconsistent.
    pub fn build(self) -> LockResult<PseudoLockProvider<S, C>> {
        let store = self
            .store
            .ok_or_else(|| LockError::InvalidConfig("store not specified".to_string()))?;
        let options = self
            .options
            .ok_or_else(|| LockError::InvalidConfig("lock options not specified".to_string()))?;
        options.validate()?;

        Ok(PseudoLockProvider {
            store,
            options,
            owner: self.owner.unwrap_or_else(OwnerId::generate),
            clock: self.clock,
            sequence_strategy: self.sequence_strategy,
            next_index: AtomicU64::new(0),
        })
    }
}

/// Provider for pseudo-locks sharing one store and one set of timings.
///
/// Every lock it creates gets its own owner id, derived from the provider's
/// instance token, so two locks on the same prefix from one process still
/// compete with each other like separate processes would.
pub struct PseudoLockProvider<S, C = SystemClock> {
    store: S,
    options: PseudoLockOptions,
    owner: OwnerId,
    clock: C,
    sequence_strategy: SequenceStrategy,
    next_index: AtomicU64,
}

impl<S: ObjectStore + Clone> PseudoLockProvider<S, SystemClock> {
    /// Returns a new builder for configuring the provider.
    pub fn builder() -> PseudoLockProviderBuilder<S> {
        PseudoLockProviderBuilder::new()
    }

    /// Creates a provider with a random instance token.
    ///
    /// Convenience method for simple use cases.
    pub fn new(store: S, options: PseudoLockOptions) -> LockResult<Self> {
        Self::builder().store(store).options(options).build()
    }
}

impl<S: ObjectStore + Clone, C: Clock> PseudoLockProvider<S, C> {
    pub fn options(&self) -> &PseudoLockOptions {
        &self.options
    }

    /// Returns the instance token locks derive their owner ids from.
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ObjectStore + Clone, C: Clock> LockProvider for PseudoLockProvider<S, C> {
    type Lock = ObjectStoreLock<S, C>;

    fn create_lock(&self, prefix: &str) -> LockResult<Self::Lock> {
        validate_prefix(prefix)?;
        let owner = self
            .owner
            .child(self.next_index.fetch_add(1, Ordering::Relaxed));
        let engine = PseudoLockEngine::new(self.store.clone(), prefix, owner, self.options)?
            .with_clock(self.clock.clone())
            .with_sequence_strategy(self.sequence_strategy);
        Ok(ObjectStoreLock::from_engine(engine))
    }
}
