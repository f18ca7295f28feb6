//! Pseudo-lock state machine.
//!
//! Simulates a mutex on a store that can only create, list and delete
//! objects:
//!
//! 1. Create a uniquely named entry under the lock prefix.
//! 2. Wait `settling` so the store's listings catch up.
//! 3. Every `polling`, list the prefix. Entries that have been listed for
//!    longer than `timeout` are deleted as stale. If the own entry sorts
//!    first among the rest, the lock is held.
//! 4. Give up (deleting the own entry) once `max_wait` has elapsed.
//!
//! States: `Idle -> Acquiring -> Held -> Idle`, or
//! `Idle -> Acquiring -> Failed -> Idle` when the wait runs out.

use std::future::Future;
use std::time::{Duration, Instant};

use pseudo_lock_core::clock::{Clock, SystemClock};
use pseudo_lock_core::entry::{LockEntry, decode, listing_prefix, validate_prefix};
use pseudo_lock_core::error::{LockError, LockResult};
use pseudo_lock_core::owner::OwnerId;
use pseudo_lock_core::timeout::{Timeout, TimeoutValue};
use pseudo_lock_core::traits::ObjectStore;
use tokio::sync::watch;
use tracing::field::Empty;
use tracing::{Span, debug, info, instrument, trace, warn};

use crate::marker::LockMarker;
use crate::observations::Observations;
use crate::options::PseudoLockOptions;
use crate::sequence::{SequenceGenerator, SequenceStrategy};

/// Lifecycle state of a [`PseudoLockEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Idle,
    Acquiring,
    Held,
    /// The last attempt ran out of time; cleared before `lock()` returns.
    Failed,
}

/// The entry created by the current attempt.
#[derive(Debug, Clone)]
struct Attempt {
    entry: LockEntry,
    name: String,
    created_at: Instant,
}

/// Where the own entry stands after a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Standing {
    First,
    Waiting { ahead: usize },
    /// The own entry is gone and old enough that a competitor was entitled to
    /// delete it.
    Reclaimed,
}

/// Drives acquire attempts for one lock prefix and one owner.
///
/// The engine is sequential: each attempt is a single poll loop and
/// `&mut self` keeps one workflow per engine. Competing acquirers are other
/// engines, usually in other processes, sharing only the store.
///
/// Dropping a `lock()` future abandons the attempt. Its entry is removed by
/// the next `lock()` call on this engine, or reclaimed by competitors once
/// it is stale.
pub struct PseudoLockEngine<S, C = SystemClock> {
    store: S,
    prefix: String,
    listing: String,
    owner: OwnerId,
    options: PseudoLockOptions,
    clock: C,
    sequence: SequenceGenerator,
    observations: Observations,
    state: LockState,
    attempt: Option<Attempt>,
}

impl<S: ObjectStore> PseudoLockEngine<S, SystemClock> {
    /// Creates an engine for `prefix`, owned by `owner`.
    pub fn new(
        store: S,
        prefix: impl Into<String>,
        owner: OwnerId,
        options: PseudoLockOptions,
    ) -> LockResult<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        options.validate()?;

        Ok(Self {
            store,
            listing: listing_prefix(&prefix),
            prefix,
            owner,
            options,
            clock: SystemClock,
            sequence: SequenceGenerator::new(SequenceStrategy::default()),
            observations: Observations::new(),
            state: LockState::Idle,
            attempt: None,
        })
    }
}

impl<S: ObjectStore, C: Clock> PseudoLockEngine<S, C> {
    /// Replaces the clock used for ages, deadlines, pauses and timestamps.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> PseudoLockEngine<S, C2> {
        PseudoLockEngine {
            store: self.store,
            prefix: self.prefix,
            listing: self.listing,
            owner: self.owner,
            options: self.options,
            clock,
            sequence: self.sequence,
            observations: self.observations,
            state: self.state,
            attempt: self.attempt,
        }
    }

    pub fn with_sequence_strategy(mut self, strategy: SequenceStrategy) -> Self {
        self.sequence = SequenceGenerator::new(strategy);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn options(&self) -> &PseudoLockOptions {
        &self.options
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Object name of the entry created by the current attempt, if any.
    pub fn entry_name(&self) -> Option<&str> {
        self.attempt.as_ref().map(|attempt| attempt.name.as_str())
    }

    /// Acquires the lock, waiting up to `max_wait` (`None` waits forever).
    ///
    /// Returns `Ok(false)` when the wait ran out. Setting `cancel` to `true`
    /// interrupts settling and polling immediately with
    /// [`LockError::Cancelled`]. Store failures abort the attempt with
    /// [`LockError::Store`]; they are not retried here.
    #[instrument(
        skip(self, cancel),
        fields(
            lock.prefix = %self.prefix,
            lock.owner = %self.owner,
            backend = self.store.backend_name(),
            max_wait = ?max_wait,
            acquired = Empty,
            elapsed_ms = Empty,
            polls = Empty,
        )
    )]
    pub async fn lock(
        &mut self,
        max_wait: Timeout,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> LockResult<bool> {
        match self.state {
            LockState::Held => return Err(LockError::AlreadyLocked(self.prefix.clone())),
            // A previous lock() future was dropped mid-attempt.
            LockState::Acquiring | LockState::Failed => self.abandon_attempt().await,
            LockState::Idle => {}
        }

        let start = self.clock.now();
        let mut polls = 0u32;
        self.state = LockState::Acquiring;
        let result = self
            .acquire(TimeoutValue::from(max_wait), start, &mut cancel, &mut polls)
            .await;

        let span = Span::current();
        span.record("polls", polls);
        span.record(
            "elapsed_ms",
            self.clock.now().saturating_duration_since(start).as_millis() as u64,
        );

        match &result {
            Ok(true) => {
                self.state = LockState::Held;
                span.record("acquired", true);
                debug!(entry = self.entry_name(), "lock acquired");
            }
            Ok(false) => {
                self.state = LockState::Failed;
                span.record("acquired", false);
                debug!("gave up waiting for lock");
                self.abandon_attempt().await;
            }
            Err(e) => {
                span.record("acquired", false);
                debug!(error = %e, "lock attempt aborted");
                self.abandon_attempt().await;
            }
        }
        result
    }

    /// Releases the lock by deleting the own entry.
    ///
    /// The engine returns to `Idle` even when the delete fails; the entry is
    /// then left for competitors to reclaim once it is stale.
    #[instrument(
        skip(self),
        fields(lock.prefix = %self.prefix, lock.owner = %self.owner, backend = self.store.backend_name())
    )]
    pub async fn unlock(&mut self) -> LockResult<()> {
        if self.state != LockState::Held {
            return Err(LockError::NotLocked(self.prefix.clone()));
        }
        self.state = LockState::Idle;

        let Some(attempt) = self.attempt.take() else {
            return Ok(());
        };
        self.observations.forget(&attempt.name);

        match self.store.delete(&attempt.name).await {
            Ok(()) => {
                debug!(entry = %attempt.name, "lock released");
                Ok(())
            }
            Err(e) => {
                warn!(
                    entry = %attempt.name,
                    error = %e,
                    "failed to delete lock entry; it will be reclaimed once stale"
                );
                Err(e.into())
            }
        }
    }

    async fn acquire(
        &mut self,
        timeout: TimeoutValue,
        start: Instant,
        cancel: &mut Option<watch::Receiver<bool>>,
        polls: &mut u32,
    ) -> LockResult<bool> {
        check_cancelled(cancel)?;
        self.register().await?;
        self.pause(self.options.settling, timeout, start, cancel)
            .await?;

        loop {
            *polls += 1;
            match self.evaluate().await? {
                Standing::First => return Ok(true),
                Standing::Waiting { ahead } => {
                    debug!(ahead, "lock held or requested by older entries");
                }
                Standing::Reclaimed => {
                    warn!(
                        entry = self.entry_name(),
                        "own lock entry was reclaimed as stale; registering a new one"
                    );
                    self.discard_entry().await;
                    self.register().await?;
                    self.pause(self.options.settling, timeout, start, cancel)
                        .await?;
                    continue;
                }
            }

            if timeout.is_expired(self.clock.now().saturating_duration_since(start)) {
                return Ok(false);
            }
            self.pause(self.options.polling, timeout, start, cancel)
                .await?;
        }
    }

    /// Creates a fresh entry for this attempt.
    async fn register(&mut self) -> LockResult<()> {
        // Seed the sequence from what is already queued.
        let listed = self.store.list(&self.listing).await?;
        let now = self.clock.now();
        self.observations.retain_listed(&listed);
        for name in &listed {
            if let Some(entry) = self.parse_entry(name) {
                self.sequence.observe(entry.sequence);
                self.observations.observe(name, now);
            }
        }

        let sequence = self.sequence.next(&self.clock);
        let entry = LockEntry::new(self.prefix.clone(), sequence, self.owner.clone());
        let name = entry.object_name();
        let marker = LockMarker {
            owner: self.owner.to_string(),
            sequence,
            created_at_ms: self.clock.unix_millis(),
        };

        self.store.create(&name, marker.to_bytes()).await?;
        debug!(entry = %name, queued = listed.len(), "created lock entry");

        self.attempt = Some(Attempt {
            entry,
            name,
            created_at: self.clock.now(),
        });
        Ok(())
    }

    /// Lists the prefix, reclaims stale entries and ranks the own entry.
    async fn evaluate(&mut self) -> LockResult<Standing> {
        let Some(attempt) = self.attempt.clone() else {
            return Ok(Standing::Reclaimed);
        };

        let listed = self.store.list(&self.listing).await?;
        let now = self.clock.now();
        self.observations.retain_listed(&listed);

        let mut eligible = Vec::with_capacity(listed.len());
        let mut stale = Vec::new();
        for name in &listed {
            let Some(entry) = self.parse_entry(name) else {
                continue;
            };
            self.sequence.observe(entry.sequence);
            self.observations.observe(name, now);

            if *name != attempt.name
                && self
                    .observations
                    .is_stale(name, now, self.options.timeout)
            {
                stale.push(name);
            } else {
                eligible.push(entry);
            }
        }

        for name in stale {
            info!(
                entry = %name,
                timeout_ms = self.options.timeout.as_millis() as u64,
                "deleting stale lock entry"
            );
            self.delete_best_effort(name).await;
        }

        eligible.sort();
        let standing = match eligible.iter().position(|entry| *entry == attempt.entry) {
            Some(0) => Standing::First,
            Some(ahead) => Standing::Waiting { ahead },
            None if now.saturating_duration_since(attempt.created_at) > self.options.timeout => {
                Standing::Reclaimed
            }
            // Not visible yet, or deleted moments ago by someone who
            // judged it stale; either way not first.
            None => Standing::Waiting {
                ahead: eligible.len(),
            },
        };
        Ok(standing)
    }

    /// Sleeps `duration`, cut short by the `max_wait` deadline or `cancel`.
    async fn pause(
        &self,
        duration: Duration,
        timeout: TimeoutValue,
        start: Instant,
        cancel: &mut Option<watch::Receiver<bool>>,
    ) -> LockResult<()> {
        let wait = timeout
            .remaining(start, self.clock.now())
            .map_or(duration, |remaining| remaining.min(duration));
        sleep_cancellable(self.clock.sleep(wait), cancel).await
    }

    fn parse_entry(&self, name: &str) -> Option<LockEntry> {
        match decode(name) {
            Ok(entry) if entry.prefix == self.prefix => Some(entry),
            Ok(entry) => {
                trace!(object = name, prefix = %entry.prefix, "ignoring entry of another lock");
                None
            }
            Err(e) => {
                trace!(object = name, error = %e, "ignoring malformed lock entry");
                None
            }
        }
    }

    async fn delete_best_effort(&self, name: &str) {
        if let Err(e) = self.store.delete(name).await {
            warn!(entry = name, error = %e, "best-effort delete of lock entry failed");
        }
    }

    async fn discard_entry(&mut self) {
        if let Some(attempt) = self.attempt.take() {
            self.observations.forget(&attempt.name);
            self.delete_best_effort(&attempt.name).await;
        }
    }

    async fn abandon_attempt(&mut self) {
        self.discard_entry().await;
        self.state = LockState::Idle;
    }
}

fn check_cancelled(cancel: &Option<watch::Receiver<bool>>) -> LockResult<()> {
    match cancel {
        Some(cancel) if *cancel.borrow() => Err(LockError::Cancelled),
        _ => Ok(()),
    }
}

async fn sleep_cancellable(
    sleep: impl Future<Output = ()>,
    cancel: &mut Option<watch::Receiver<bool>>,
) -> LockResult<()> {
    let Some(cancel) = cancel.as_mut() else {
        sleep.await;
        return Ok(());
    };

    tokio::pin!(sleep);
    loop {
        if *cancel.borrow_and_update() {
            return Err(LockError::Cancelled);
        }
        tokio::select! {
            () = &mut sleep => return Ok(()),
            changed = cancel.changed() => {
                if changed.is_err() {
                    // Sender dropped; nothing can cancel any more.
                    (&mut sleep).await;
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pseudo_lock_core::clock::ManualClock;
    use pseudo_lock_core::entry::encode;
    use pseudo_lock_memory::{MemoryObjectStore, StoreOp};

    const PREFIX: &str = "locks/config";

    fn options() -> PseudoLockOptions {
        PseudoLockOptions::new(
            Duration::from_millis(5000),
            Duration::from_millis(200),
            Duration::from_millis(300),
        )
    }

    /// Paused time advances in whole timer ticks.
    fn assert_close(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual <= expected + Duration::from_millis(5),
            "{actual:?} is not close to {expected:?}"
        );
    }

    fn engine(store: &MemoryObjectStore, owner: &str) -> PseudoLockEngine<MemoryObjectStore> {
        PseudoLockEngine::new(store.clone(), PREFIX, OwnerId::new(owner).unwrap(), options())
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_uncontended_lock_and_unlock() {
        let store = MemoryObjectStore::new();
        let mut lock = engine(&store, "a");
        assert_eq!(lock.state(), LockState::Idle);

        let started = tokio::time::Instant::now();
        assert!(lock.lock(Some(Duration::from_secs(2)), None).await.unwrap());
        assert_close(started.elapsed(), options().settling);
        assert_eq!(lock.state(), LockState::Held);

        let name = lock.entry_name().unwrap().to_string();
        assert!(name.starts_with("locks/config_"));
        assert!(name.ends_with("_a"));
        assert_eq!(store.object_names(), vec![name.clone()]);
        let marker = LockMarker::from_bytes(&store.contents(&name).unwrap()).unwrap();
        assert_eq!(marker.owner, "a");

        lock.unlock().await.unwrap();
        assert_eq!(lock.state(), LockState::Idle);
        assert!(store.object_names().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_misuse() {
        let store = MemoryObjectStore::new();
        let mut lock = engine(&store, "a");
        assert!(matches!(lock.unlock().await, Err(LockError::NotLocked(_))));

        assert!(lock.lock(None, None).await.unwrap());
        assert!(matches!(
            lock.lock(None, None).await,
            Err(LockError::AlreadyLocked(_))
        ));
        assert_eq!(lock.state(), LockState::Held);
        lock.unlock().await.unwrap();
        assert!(matches!(lock.unlock().await, Err(LockError::NotLocked(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_behind_older_entry() {
        let store = MemoryObjectStore::new();
        let mut holder = engine(&store, "a");
        let mut waiter = engine(&store, "b");
        assert!(holder.lock(None, None).await.unwrap());

        let started = tokio::time::Instant::now();
        assert!(!waiter.lock(Some(Duration::from_millis(500)), None).await.unwrap());
        assert_close(started.elapsed(), Duration::from_millis(500));
        assert_eq!(waiter.state(), LockState::Idle);
        assert_eq!(waiter.entry_name(), None);
        assert_eq!(store.object_names(), vec![holder.entry_name().unwrap().to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_clock_drives_the_deadline() {
        let store = MemoryObjectStore::new();
        let mut holder = engine(&store, "a");
        assert!(holder.lock(None, None).await.unwrap());

        let clock = ManualClock::new();
        let mut waiter = engine(&store, "b").with_clock(clock.clone());
        let started = clock.now();
        let attempt = tokio::time::timeout(
            Duration::from_secs(3600),
            waiter.lock(Some(Duration::from_millis(500)), None),
        )
        .await;
        assert!(!attempt.expect("waiter must give up on its own clock").unwrap());
        assert_eq!(clock.now() - started, Duration::from_millis(500));
        assert_eq!(waiter.state(), LockState::Idle);
        assert_eq!(store.object_names(), vec![holder.entry_name().unwrap().to_string()]);
    }

    #[tokio::test]
    async fn test_staleness_boundary_on_manual_clock() {
        // Polls land 1ms either side of the timeout.
        let opts = PseudoLockOptions::new(
            Duration::from_millis(1000),
            Duration::from_millis(2),
            Duration::from_millis(999),
        );
        let store = MemoryObjectStore::new();
        let crashed = encode(PREFIX, 1, &OwnerId::new("crashed").unwrap());
        store.create(&crashed, Vec::new()).await.unwrap();

        let clock = ManualClock::new();
        let mut waiter =
            PseudoLockEngine::new(store.clone(), PREFIX, OwnerId::new("b").unwrap(), opts)
                .unwrap()
                .with_clock(clock.clone());

        // Listed for 999ms: kept, so the waiter is still behind it.
        assert!(!waiter.lock(Some(Duration::from_millis(999)), None).await.unwrap());
        assert_eq!(store.object_names(), vec![crashed.clone()]);

        // Listed for 1001ms: deleted, and the waiter moves up.
        assert!(waiter.lock(Some(Duration::from_millis(2)), None).await.unwrap());
        assert_eq!(
            store.object_names(),
            vec![waiter.entry_name().unwrap().to_string()]
        );
        assert_eq!(store.calls(StoreOp::Delete), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_wait_still_evaluates_once() {
        let store = MemoryObjectStore::new();
        let mut lock = engine(&store, "a");
        assert!(lock.lock(Some(Duration::ZERO), None).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignores_malformed_and_foreign_names() {
        let store = MemoryObjectStore::new();
        for name in [
            "locks/config_",
            "locks/config_readme.txt",
            "locks/config_00000000000000000000_",
            "locks/config_00000000000000000000_bad owner",
            "locks/config_nested_00000000000000000000_other",
        ] {
            store.create(name, Vec::new()).await.unwrap();
        }

        let mut lock = engine(&store, "a").with_sequence_strategy(SequenceStrategy::Counter);
        assert!(lock.lock(Some(Duration::from_secs(1)), None).await.unwrap());
        lock.unlock().await.unwrap();
        assert_eq!(store.object_names().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequence_seeded_from_queue() {
        let store = MemoryObjectStore::new();
        let queued = encode(PREFIX, 41, &OwnerId::new("z").unwrap());
        store.create(&queued, Vec::new()).await.unwrap();

        let mut lock = engine(&store, "a").with_sequence_strategy(SequenceStrategy::Counter);
        assert!(!lock.lock(Some(Duration::from_millis(300)), None).await.unwrap());
        assert!(!store.object_names().iter().any(|n| n.ends_with("_a")));

        // The next attempt is queued behind the existing entry.
        let mut other = engine(&store, "b").with_sequence_strategy(SequenceStrategy::Counter);
        let handle = tokio::spawn(async move {
            let acquired = other.lock(Some(Duration::from_millis(300)), None).await;
            (acquired, other)
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let names = store.object_names();
        assert!(names.contains(&encode(PREFIX, 42, &OwnerId::new("b").unwrap())));
        let (acquired, _) = handle.await.unwrap();
        assert!(!acquired.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_failure_aborts() {
        let store = MemoryObjectStore::new();
        store.fail_next(StoreOp::Create, 1);
        let mut lock = engine(&store, "a");
        assert!(matches!(
            lock.lock(None, None).await,
            Err(LockError::Store(_))
        ));
        assert_eq!(lock.state(), LockState::Idle);
        assert!(store.object_names().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_failure_aborts_and_cleans_up() {
        let store = MemoryObjectStore::new();
        let mut lock = engine(&store, "a");
        // First list seeds the sequence, the second is the first evaluation.
        let task = {
            let store = store.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                store.fail_next(StoreOp::List, 1);
            })
        };
        assert!(matches!(
            lock.lock(None, None).await,
            Err(LockError::Store(_))
        ));
        task.await.unwrap();
        assert_eq!(lock.state(), LockState::Idle);
        assert!(store.object_names().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlock_failure_still_returns_to_idle() {
        let store = MemoryObjectStore::new();
        let mut lock = engine(&store, "a");
        assert!(lock.lock(None, None).await.unwrap());

        store.fail_next(StoreOp::Delete, 1);
        assert!(matches!(lock.unlock().await, Err(LockError::Store(_))));
        assert_eq!(lock.state(), LockState::Idle);
        assert_eq!(store.object_names().len(), 1);

        // The leftover entry blocks until it is stale, then gets reclaimed.
        let started = tokio::time::Instant::now();
        assert!(lock.lock(None, None).await.unwrap());
        assert!(started.elapsed() > options().timeout);
        assert_eq!(store.object_names().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_polling() {
        let store = MemoryObjectStore::new();
        let mut holder = engine(&store, "a");
        assert!(holder.lock(None, None).await.unwrap());

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut waiter = engine(&store, "b");
        let task = tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let result = waiter.lock(None, Some(cancel_rx)).await;
            (result, started.elapsed(), waiter)
        });

        tokio::time::sleep(Duration::from_millis(450)).await;
        cancel_tx.send(true).unwrap();
        let (result, elapsed, waiter) = task.await.unwrap();

        assert!(matches!(result, Err(LockError::Cancelled)));
        assert_close(elapsed, Duration::from_millis(450));
        assert_eq!(waiter.state(), LockState::Idle);
        assert_eq!(store.object_names().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_creates_nothing() {
        let store = MemoryObjectStore::new();
        let (_cancel_tx, cancel_rx) = watch::channel(true);
        let mut lock = engine(&store, "a");
        assert!(matches!(
            lock.lock(None, Some(cancel_rx)).await,
            Err(LockError::Cancelled)
        ));
        assert_eq!(store.calls(StoreOp::Create), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_cancel_sender_keeps_waiting() {
        let store = MemoryObjectStore::new();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        drop(cancel_tx);
        let mut lock = engine(&store, "a");
        assert!(lock.lock(Some(Duration::from_secs(1)), Some(cancel_rx)).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_attempt_is_cleaned_up_by_next_lock() {
        let store = MemoryObjectStore::new();
        let mut lock = engine(&store, "a");

        let attempt = tokio::time::timeout(Duration::from_millis(100), lock.lock(None, None)).await;
        assert!(attempt.is_err());
        assert_eq!(lock.state(), LockState::Acquiring);
        let abandoned = lock.entry_name().unwrap().to_string();

        assert!(lock.lock(None, None).await.unwrap());
        assert_ne!(lock.entry_name(), Some(abandoned.as_str()));
        assert_eq!(store.object_names().len(), 1);
    }
}
