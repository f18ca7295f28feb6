//! In-memory object store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use pseudo_lock_core::clock::{Clock, SystemClock};
use pseudo_lock_core::error::{StoreError, StoreResult};
use pseudo_lock_core::traits::ObjectStore;
use tracing::trace;

/// Store operations, used for fault injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Create,
    Delete,
    List,
}

#[derive(Debug)]
struct ObjectRecord {
    contents: Vec<u8>,
    writer: u64,
    created_at: Instant,
    /// Client and time of deletion, while the deletion is still propagating.
    deleted: Option<(u64, Instant)>,
}

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<String, ObjectRecord>,
    unavailable: bool,
    pending_failures: HashMap<StoreOp, usize>,
    calls: HashMap<StoreOp, u64>,
}

#[derive(Debug)]
struct Backend<C> {
    state: Mutex<State>,
    clock: C,
    list_lag: Duration,
    next_client: AtomicU64,
}

/// Object store held entirely in memory.
///
/// Each value is one *client* of a shared backend. A client always sees its
/// own creates and deletes immediately; creates and deletes made by other
/// clients only show up in its listings once `list_lag` has passed. With a
/// zero lag every client sees every change at once. Clones share the client
/// identity; [`MemoryObjectStore::client`] opens a new one.
#[derive(Debug)]
pub struct MemoryObjectStore<C: Clock = SystemClock> {
    backend: Arc<Backend<C>>,
    client: u64,
}

impl<C: Clock> Clone for MemoryObjectStore<C> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            client: self.client,
        }
    }
}

impl MemoryObjectStore<SystemClock> {
    /// Creates a strongly consistent store.
    pub fn new() -> Self {
        Self::with_clock(SystemClock, Duration::ZERO)
    }

    /// Creates a store whose listings lag other clients' writes by `list_lag`.
    pub fn with_list_lag(list_lag: Duration) -> Self {
        Self::with_clock(SystemClock, list_lag)
    }
}

impl Default for MemoryObjectStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryObjectStore<C> {
    /// Creates a store that measures propagation with `clock`.
    pub fn with_clock(clock: C, list_lag: Duration) -> Self {
        Self {
            backend: Arc::new(Backend {
                state: Mutex::new(State::default()),
                clock,
                list_lag,
                next_client: AtomicU64::new(1),
            }),
            client: 0,
        }
    }

    /// Opens another client of the same backend.
    pub fn client(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            client: self.backend.next_client.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Returns the configured propagation delay.
    pub fn list_lag(&self) -> Duration {
        self.backend.list_lag
    }

    /// Makes every operation fail with [`StoreError::Unavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Makes the next `count` calls of `op` fail with [`StoreError::Unavailable`].
    pub fn fail_next(&self, op: StoreOp, count: usize) {
        *self.state().pending_failures.entry(op).or_insert(0) += count;
    }

    /// Number of calls of `op` made by any client so far.
    pub fn calls(&self, op: StoreOp) -> u64 {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    /// Names of all objects that exist right now, ignoring propagation delay.
    pub fn object_names(&self) -> Vec<String> {
        self.state()
            .objects
            .iter()
            .filter(|(_, record)| record.deleted.is_none())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Contents of an existing object, ignoring propagation delay.
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.state()
            .objects
            .get(name)
            .filter(|record| record.deleted.is_none())
            .map(|record| record.contents.clone())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.backend
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Counts the call and applies injected failures.
    fn begin(&self, state: &mut State, op: StoreOp) -> StoreResult<()> {
        *state.calls.entry(op).or_insert(0) += 1;
        if state.unavailable {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        if let Some(pending) = state.pending_failures.get_mut(&op)
            && *pending > 0
        {
            *pending -= 1;
            return Err(StoreError::Unavailable(format!(
                "injected {op:?} failure"
            )));
        }
        Ok(())
    }

    fn propagated(&self, at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(at) >= self.backend.list_lag
    }

    fn is_visible(&self, record: &ObjectRecord, now: Instant) -> bool {
        let created_visible =
            record.writer == self.client || self.propagated(record.created_at, now);
        let deleted_visible = match record.deleted {
            None => false,
            Some((deleter, at)) => deleter == self.client || self.propagated(at, now),
        };
        created_visible && !deleted_visible
    }
}

impl<C: Clock> ObjectStore for MemoryObjectStore<C> {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, name: &str, contents: Vec<u8>) -> StoreResult<()> {
        let now = self.backend.clock.now();
        let mut state = self.state();
        self.begin(&mut state, StoreOp::Create)?;
        trace!(object = name, client = self.client, "memory store create");
        state.objects.insert(
            name.to_string(),
            ObjectRecord {
                contents,
                writer: self.client,
                created_at: now,
                deleted: None,
            },
        );
        Ok(())
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        let now = self.backend.clock.now();
        let mut state = self.state();
        self.begin(&mut state, StoreOp::Delete)?;
        trace!(object = name, client = self.client, "memory store delete");
        if let Some(record) = state.objects.get_mut(name)
            && record.deleted.is_none()
        {
            record.deleted = Some((self.client, now));
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let now = self.backend.clock.now();
        let mut state = self.state();
        self.begin(&mut state, StoreOp::List)?;

        // Deletions seen by everyone can be forgotten.
        state.objects.retain(|_, record| match record.deleted {
            Some((_, at)) => !self.propagated(at, now),
            None => true,
        });

        Ok(state
            .objects
            .range(prefix.to_string()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .filter(|(_, record)| self.is_visible(record, now))
            .map(|(name, _)| name.clone())
            .collect())
    }
}
