//! Timing configuration for pseudo-locks.

use std::time::Duration;

use pseudo_lock_core::error::{LockError, LockResult};
use serde::{Deserialize, Serialize};

/// Timing parameters of the pseudo-lock protocol.
///
/// All values are supplied by the caller. [`PseudoLockOptions::recommended`]
/// is available for deployments that want the customary supervisor timings,
/// but nothing falls back to it implicitly.
///
/// Durations use humantime notation when (de)serialized:
///
/// ```toml
/// timeout = "15m"
/// polling = "1s"
/// settling = "5s"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PseudoLockOptions {
    /// Age after which an entry is presumed abandoned and may be deleted by
    /// any competitor. Ages count from the first listing that showed the
    /// entry, so this must exceed the longest wait plus the longest critical
    /// section, or live holders get evicted.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Interval between listings while waiting.
    #[serde(with = "humantime_serde")]
    pub polling: Duration,

    /// Delay between creating an entry and the first listing. Must cover the
    /// store's list consistency window; underestimating it breaks mutual
    /// exclusion.
    #[serde(with = "humantime_serde")]
    pub settling: Duration,
}

impl PseudoLockOptions {
    pub fn new(timeout: Duration, polling: Duration, settling: Duration) -> Self {
        Self {
            timeout,
            polling,
            settling,
        }
    }

    /// Timings customarily used for cloud object stores: 15 minute timeout,
    /// 1 second polling and 5 seconds of settling.
    pub fn recommended() -> Self {
        Self::new(
            Duration::from_secs(15 * 60),
            Duration::from_secs(1),
            Duration::from_secs(5),
        )
    }

    /// Parses options from a TOML document and validates them.
    pub fn from_toml_str(source: &str) -> LockResult<Self> {
        let options: Self = toml::from_str(source)
            .map_err(|e| LockError::InvalidConfig(format!("failed to parse lock options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Checks the relationships the protocol depends on.
    pub fn validate(&self) -> LockResult<()> {
        if self.polling.is_zero() {
            return Err(LockError::InvalidConfig(
                "polling interval must be greater than zero".to_string(),
            ));
        }
        if self.timeout <= self.settling {
            return Err(LockError::InvalidConfig(format!(
                "timeout ({:?}) must be longer than settling ({:?})",
                self.timeout, self.settling
            )));
        }
        Ok(())
    }
}
