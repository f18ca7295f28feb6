//! Example: Using the meta-crate (all backends)
//!
//! Run with: `cargo run --example meta_crate`
//!
//! This example shows how to use the meta-crate which re-exports
//! all backend implementations, and how to write code against
//! [`LockProvider`] so the backend can be swapped.

use pseudo_lock::*;
use std::time::Duration;

async fn update_config<P: LockProvider>(provider: &P, label: &str) -> LockResult<()> {
    match provider.lock_prefix("locks/config", Some(Duration::from_secs(5))).await? {
        Some(mut lock) => {
            println!("{label}: lock acquired");
            lock.unlock().await?;
            println!("{label}: lock released");
        }
        None => println!("{label}: lock busy"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Example: Using pseudo-lock meta-crate\n");

    // Static backend: nothing to arbitrate
    println!("=== Static ===");
    update_config(&StaticLockProvider::new(), "static").await?;

    // Memory backend
    println!("\n=== Memory Backend ===");
    let options = PseudoLockOptions::new(
        Duration::from_secs(30),
        Duration::from_millis(100),
        Duration::from_millis(50),
    );
    let memory = PseudoLockProvider::new(MemoryObjectStore::new(), options)?;
    update_config(&memory, "memory").await?;

    // File backend
    println!("\n=== File Backend ===");
    let file = PseudoLockProvider::new(FileObjectStore::new("/tmp/pseudo-locks")?, options)?;
    update_config(&file, "file").await?;

    Ok(())
}
