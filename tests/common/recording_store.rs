//! Store wrapper that records every call, for asserting protocol order.

use std::sync::{Arc, Mutex};

use pseudo_lock_core::error::StoreResult;
use pseudo_lock_core::traits::ObjectStore;

/// One recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Delete(String),
    List(String),
}

/// Forwards to an inner store and logs the calls it makes.
#[derive(Debug, Clone)]
pub struct RecordingStore<S> {
    inner: S,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl<S: ObjectStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl<S: ObjectStore> ObjectStore for RecordingStore<S> {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn create(&self, name: &str, contents: Vec<u8>) -> StoreResult<()> {
        self.record(Call::Create(name.to_string()));
        self.inner.create(name, contents).await
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        self.record(Call::Delete(name.to_string()));
        self.inner.delete(name).await
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.record(Call::List(prefix.to_string()));
        self.inner.list(prefix).await
    }
}
