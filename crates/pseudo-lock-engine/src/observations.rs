//! Local bookkeeping of when entries were first seen.
//!
//! There is no way to detect that a holder died, and timestamps from the
//! store or from other machines are not trusted. An entry's age is therefore
//! measured from the moment *this* acquirer first listed it, on its own
//! clock. An entry older than the timeout is stale.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// First-seen times of the entries under one prefix.
#[derive(Debug, Default)]
pub struct Observations {
    first_seen: HashMap<String, Instant>,
}

impl Observations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `name` was listed at `now` and returns its age.
    pub fn observe(&mut self, name: &str, now: Instant) -> Duration {
        let first_seen = *self.first_seen.entry(name.to_string()).or_insert(now);
        now.saturating_duration_since(first_seen)
    }

    /// Age of `name` at `now`, if it has been seen.
    fn age(&self, name: &str, now: Instant) -> Option<Duration> {
        self.first_seen
            .get(name)
            .map(|first_seen| now.saturating_duration_since(*first_seen))
    }

    /// Whether `name` has been listed for longer than `timeout`.
    pub fn is_stale(&self, name: &str, now: Instant, timeout: Duration) -> bool {
        self.age(name, now).is_some_and(|age| age > timeout)
    }

    /// Drops names that are no longer listed.
    pub fn retain_listed(&mut self, listed: &[String]) {
        self.first_seen
            .retain(|name, _| listed.iter().any(|listed| listed == name));
    }

    pub fn forget(&mut self, name: &str) {
        self.first_seen.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pseudo_lock_core::clock::{Clock, ManualClock};

    const TIMEOUT: Duration = Duration::from_millis(5000);
    const EPSILON: Duration = Duration::from_millis(1);

    #[test]
    fn test_staleness_boundary() {
        let clock = ManualClock::new();
        let mut observations = Observations::new();
        observations.observe("p_00000000000000000001_a", clock.now());

        clock.advance(TIMEOUT - EPSILON);
        assert!(!observations.is_stale("p_00000000000000000001_a", clock.now(), TIMEOUT));

        clock.advance(EPSILON);
        assert!(!observations.is_stale("p_00000000000000000001_a", clock.now(), TIMEOUT));

        clock.advance(EPSILON);
        assert!(observations.is_stale("p_00000000000000000001_a", clock.now(), TIMEOUT));
    }

    #[test]
    fn test_age_counts_from_first_observation() {
        let clock = ManualClock::new();
        let mut observations = Observations::new();
        assert_eq!(observations.observe("a", clock.now()), Duration::ZERO);
        clock.advance(Duration::from_secs(2));
        assert_eq!(observations.observe("a", clock.now()), Duration::from_secs(2));
        assert_eq!(observations.observe("b", clock.now()), Duration::ZERO);
        assert!(!observations.is_stale("never-seen", clock.now(), Duration::ZERO));
    }

    #[test]
    fn test_retain_listed_resets_reappearing_names() {
        let clock = ManualClock::new();
        let mut observations = Observations::new();
        observations.observe("a", clock.now());
        observations.observe("b", clock.now());

        observations.retain_listed(&["b".to_string()]);
        clock.advance(Duration::from_secs(10));
        assert_eq!(observations.observe("a", clock.now()), Duration::ZERO);
        assert_eq!(observations.observe("b", clock.now()), Duration::from_secs(10));

        observations.forget("b");
        clock.advance(Duration::from_secs(1));
        assert_eq!(observations.observe("b", clock.now()), Duration::ZERO);
        assert_eq!(observations.observe("a", clock.now()), Duration::from_secs(1));
    }
}
