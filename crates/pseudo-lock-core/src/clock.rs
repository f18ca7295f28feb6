//! Clock abstraction for testable time handling.
//!
//! Lock entry ages are always measured on the observer's own clock; nothing
//! read from the store is trusted as a timestamp.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time and waits on it.
///
/// Everything time-related in a lock attempt goes through one clock: entry
/// ages, the `max_wait` deadline and the settling and polling pauses.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic time, used for entry ages and wait deadlines.
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch, used for timestamp
    /// sequences and marker contents.
    fn unix_millis(&self) -> u64;

    /// Suspends until `duration` has passed on this clock.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Real clock.
///
/// Monotonic time is read through tokio, so tests running with paused time
/// see the same instants the runtime's timers use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn unix_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Clock that only moves when told to.
///
/// Sleeping advances the clock by the requested duration and yields, so an
/// engine driven by a `ManualClock` runs through virtual time without any
/// real waiting. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<(Instant, u64)>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at_unix_millis(1_700_000_000_000)
    }

    /// Creates a clock whose wall-clock reading starts at `unix_millis`.
    pub fn starting_at_unix_millis(unix_millis: u64) -> Self {
        Self {
            current: Arc::new(Mutex::new((Instant::now(), unix_millis))),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.0 += duration;
        current.1 += duration.as_millis() as u64;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).0
    }

    fn unix_millis(&self) -> u64 {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).1
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}
