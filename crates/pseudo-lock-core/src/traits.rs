//! Core traits for pseudo-locks.

use std::future::Future;
use std::sync::Arc;

use crate::error::{LockResult, StoreResult};
use crate::timeout::Timeout;

// ============================================================================
// Object Store Trait
// ============================================================================

/// Minimal object storage used to simulate a lock.
///
/// Only create, delete and prefix listing are required. Backends need not
/// offer compare-and-swap or read-after-write consistency: `list` may omit
/// objects created moments ago or still return objects deleted moments ago.
///
/// # Contract
///
/// * `create` fails (rather than silently succeeding) when the backend is
///   unreachable or refuses the write.
/// * `delete` of an object that does not exist succeeds.
/// * `list` returns the full names of all objects starting with `prefix`.
pub trait ObjectStore: Send + Sync {
    /// Short backend label used in tracing fields.
    fn backend_name(&self) -> &'static str;

    /// Creates (or overwrites) the object `name` with `contents`.
    fn create(&self, name: &str, contents: Vec<u8>)
    -> impl Future<Output = StoreResult<()>> + Send;

    /// Deletes the object `name`. Missing objects are not an error.
    fn delete(&self, name: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Lists the names of all objects starting with `prefix`.
    fn list(&self, prefix: &str) -> impl Future<Output = StoreResult<Vec<String>>> + Send;
}

impl<S: ObjectStore> ObjectStore for Arc<S> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn create(
        &self,
        name: &str,
        contents: Vec<u8>,
    ) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).create(name, contents)
    }

    fn delete(&self, name: &str) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).delete(name)
    }

    fn list(&self, prefix: &str) -> impl Future<Output = StoreResult<Vec<String>>> + Send {
        (**self).list(prefix)
    }
}

// ============================================================================
// Pseudo-Lock Trait
// ============================================================================

/// A mutual exclusion lock shared by cooperating processes.
///
/// Guards read-modify-write cycles on shared state. The lock arbitrates
/// between processes only: one lock value serves one workflow at a time,
/// which `&mut self` enforces. Threads of the same process that need the
/// same prefix must each create their own lock (and should usually also
/// serialize locally).
///
/// # Example
///
/// ```rust,ignore
/// if lock.lock(Some(Duration::from_secs(10))).await? {
///     let config = read_config(&store).await?;
///     write_config(&store, config.with_change()).await?;
///     lock.unlock().await?;
/// } else {
///     // Someone else is updating; try again later.
/// }
/// ```
pub trait PseudoLock: Send {
    /// Returns the prefix identifying this lock.
    fn prefix(&self) -> &str;

    /// Acquires the lock, waiting up to `max_wait`.
    ///
    /// # Arguments
    ///
    /// * `max_wait` - Maximum time to wait. `None` means wait indefinitely.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Lock acquired
    /// * `Ok(false)` - `max_wait` expired first; the resource may still be contested
    /// * `Err(LockError::Store)` - The store failed; the attempt was abandoned
    /// * `Err(LockError::AlreadyLocked)` - This lock value already holds the lock
    fn lock(&mut self, max_wait: Timeout) -> impl Future<Output = LockResult<bool>> + Send;

    /// Releases the lock.
    ///
    /// The lock is considered released even when an error is returned.
    fn unlock(&mut self) -> impl Future<Output = LockResult<()>> + Send;
}

// ============================================================================
// Provider Traits
// ============================================================================

/// Factory for creating pseudo-locks by prefix.
///
/// Providers encapsulate the store and timing configuration, so the code
/// that protects a resource only needs to know the prefix.
///
/// # Example
///
/// ```rust,ignore
/// // Configure once at startup
/// let provider = PseudoLockProvider::builder()
///     .store(store)
///     .options(PseudoLockOptions::recommended())
///     .build()?;
///
/// // Create locks by prefix anywhere in the application
/// let mut lock = provider.create_lock("locks/config")?;
/// ```
pub trait LockProvider: Send + Sync {
    /// The lock type created by this provider.
    type Lock: PseudoLock;

    /// Creates a lock for `prefix`.
    fn create_lock(&self, prefix: &str) -> LockResult<Self::Lock>;
}

// ============================================================================
// Convenience Extensions
// ============================================================================

/// Extension trait providing convenience methods for lock providers.
pub trait LockProviderExt: LockProvider {
    /// Creates a lock for `prefix` and acquires it.
    ///
    /// Returns `Ok(None)` when `max_wait` expired before the lock was held.
    fn lock_prefix(
        &self,
        prefix: &str,
        max_wait: Timeout,
    ) -> impl Future<Output = LockResult<Option<Self::Lock>>> + Send
    where
        Self: Sync,
    {
        async move {
            let mut lock = self.create_lock(prefix)?;
            if lock.lock(max_wait).await? {
                Ok(Some(lock))
            } else {
                Ok(None)
            }
        }
    }
}

// Blanket implementation for all LockProviders
impl<T: LockProvider> LockProviderExt for T {}
