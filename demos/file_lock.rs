//! Example: Using a directory as the lock store
//!
//! Run with: `cargo run --example file_lock`
//!
//! Point two terminals at the same directory (for instance an NFS mount) to
//! watch them take turns.

use pseudo_lock_core::prelude::*;
use pseudo_lock_engine::{PseudoLockOptions, PseudoLockProvider};
use pseudo_lock_file::FileObjectStore;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let directory = std::env::var("PSEUDO_LOCK_DIR").unwrap_or_else(|_| "/tmp/pseudo-locks".to_string());

    // Create a provider over the directory
    let provider = PseudoLockProvider::builder()
        .store(FileObjectStore::new(&directory)?)
        .options(PseudoLockOptions::new(
            Duration::from_secs(60),
            Duration::from_millis(250),
            Duration::from_millis(500),
        ))
        .build()?;

    println!("Created provider on {directory} (owner {})", provider.owner());

    // Create a lock by prefix
    let mut lock = provider.create_lock("locks/example-resource")?;
    println!("Created lock: {}", lock.prefix());

    println!("Acquiring lock with 10 second wait...");
    if lock.lock(Some(Duration::from_secs(10))).await? {
        println!("Lock acquired as {}", lock.entry_name().unwrap_or_default());

        // Do some work while holding the lock
        tokio::time::sleep(Duration::from_secs(2)).await;
        println!("Work completed");

        lock.unlock().await?;
        println!("Lock released");
    } else {
        println!("Lock is currently held by another process");
    }

    Ok(())
}
