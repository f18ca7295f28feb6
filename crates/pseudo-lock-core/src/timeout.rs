//! Wait-time helpers.

use std::time::{Duration, Instant};

/// Maximum time a `lock()` call may wait.
///
/// - `Some(duration)` - Wait up to this duration
/// - `None` - Wait indefinitely
pub type Timeout = Option<Duration>;

/// Deadline arithmetic for a `lock()` call.
///
/// Keeps the full `Duration`, so sub-millisecond waits are honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutValue {
    limit: Option<Duration>,
}

impl TimeoutValue {
    /// Returns `true` once `elapsed` has reached this timeout.
    pub fn is_expired(&self, elapsed: Duration) -> bool {
        self.limit.is_some_and(|limit| elapsed >= limit)
    }

    /// Time left before the deadline that started at `start`, measured at `now`.
    ///
    /// Returns `None` for an infinite timeout.
    pub fn remaining(&self, start: Instant, now: Instant) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(now.saturating_duration_since(start)))
    }
}

impl From<Option<Duration>> for TimeoutValue {
    fn from(timeout: Option<Duration>) -> Self {
        Self { limit: timeout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_never_expires() {
        let timeout = TimeoutValue::from(None);
        assert!(!timeout.is_expired(Duration::from_secs(u32::MAX as u64)));
        let now = Instant::now();
        assert_eq!(timeout.remaining(now, now), None);
    }

    #[test]
    fn test_remaining_saturates() {
        let timeout = TimeoutValue::from(Some(Duration::from_millis(500)));
        let start = Instant::now();
        assert_eq!(
            timeout.remaining(start, start + Duration::from_millis(200)),
            Some(Duration::from_millis(300))
        );
        assert_eq!(
            timeout.remaining(start, start + Duration::from_secs(2)),
            Some(Duration::ZERO)
        );
        assert!(timeout.is_expired(Duration::from_millis(500)));
        assert!(!timeout.is_expired(Duration::from_millis(499)));
    }

    #[test]
    fn test_zero_expires_immediately() {
        let timeout = TimeoutValue::from(Some(Duration::ZERO));
        assert!(timeout.is_expired(Duration::ZERO));
    }

    #[test]
    fn test_sub_millisecond_wait_is_kept() {
        let timeout = TimeoutValue::from(Some(Duration::from_micros(900)));
        assert!(!timeout.is_expired(Duration::ZERO));
        assert!(!timeout.is_expired(Duration::from_micros(899)));
        assert!(timeout.is_expired(Duration::from_micros(900)));

        let start = Instant::now();
        assert_eq!(
            timeout.remaining(start, start + Duration::from_micros(400)),
            Some(Duration::from_micros(500))
        );
    }
}
