//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod recording_store;

use std::time::Duration;

use pseudo_lock_engine::PseudoLockOptions;

/// Installs a test subscriber honouring `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Options from millisecond values.
pub fn options(timeout_ms: u64, polling_ms: u64, settling_ms: u64) -> PseudoLockOptions {
    PseudoLockOptions::new(
        Duration::from_millis(timeout_ms),
        Duration::from_millis(polling_ms),
        Duration::from_millis(settling_ms),
    )
}
