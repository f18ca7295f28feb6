//! Example: Several workers sharing an in-memory store
//!
//! Run with: `cargo run --example memory_lock`

use pseudo_lock_core::prelude::*;
use pseudo_lock_engine::{PseudoLockOptions, PseudoLockProvider};
use pseudo_lock_memory::MemoryObjectStore;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Listings lag writes by 100ms; settling has to cover that.
    let store = MemoryObjectStore::with_list_lag(Duration::from_millis(100));
    let options = PseudoLockOptions::new(
        Duration::from_secs(30),
        Duration::from_millis(50),
        Duration::from_millis(150),
    );

    let mut workers = Vec::new();
    for worker in 0..3 {
        // One store client per worker, like separate processes
        let provider = PseudoLockProvider::new(store.client(), options)?;
        workers.push(tokio::spawn(async move {
            let mut lock = provider.create_lock("locks/counter")?;
            if lock.lock(Some(Duration::from_secs(5))).await? {
                println!("worker {worker} holds the lock");
                tokio::time::sleep(Duration::from_millis(200)).await;
                lock.unlock().await?;
                println!("worker {worker} released the lock");
            } else {
                println!("worker {worker} gave up");
            }
            Ok::<_, LockError>(())
        }));
    }

    for worker in workers {
        worker.await??;
    }
    Ok(())
}
