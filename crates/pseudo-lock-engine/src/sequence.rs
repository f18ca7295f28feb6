//! Sequence generation for new lock entries.

use pseudo_lock_core::clock::Clock;
use serde::{Deserialize, Serialize};

/// Where the base value of a new entry's sequence comes from.
///
/// Either way the value is raised above every sequence previously generated
/// locally and every sequence observed under the prefix, which narrows (but
/// cannot close) the gap between sequence order and real-time order when
/// clocks are not synchronized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceStrategy {
    /// Wall-clock milliseconds of the acquirer.
    #[default]
    Timestamp,
    /// A local counter starting at zero.
    Counter,
}

/// Produces non-decreasing sequences for one lock prefix.
#[derive(Debug, Clone, Default)]
pub struct SequenceGenerator {
    strategy: SequenceStrategy,
    last: Option<u64>,
    highest_observed: Option<u64>,
}

impl SequenceGenerator {
    pub fn new(strategy: SequenceStrategy) -> Self {
        Self {
            strategy,
            last: None,
            highest_observed: None,
        }
    }

    /// Records a sequence seen in a listing.
    pub fn observe(&mut self, sequence: u64) {
        self.highest_observed = Some(self.highest_observed.map_or(sequence, |h| h.max(sequence)));
    }

    /// Returns the sequence for the next entry.
    pub fn next<C: Clock>(&mut self, clock: &C) -> u64 {
        let base = match self.strategy {
            SequenceStrategy::Timestamp => clock.unix_millis(),
            SequenceStrategy::Counter => 0,
        };
        let next = [self.last, self.highest_observed]
            .into_iter()
            .flatten()
            .map(|seen| seen.saturating_add(1))
            .fold(base, u64::max);
        self.last = Some(next);
        next
    }
}
