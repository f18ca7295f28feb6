//! Contents written into lock entry objects.

use serde::{Deserialize, Serialize};

/// Payload of a lock entry object.
///
/// Only the object name takes part in the protocol. The payload exists for
/// operators inspecting the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockMarker {
    pub owner: String,
    pub sequence: u64,
    /// Creator's wall clock, informational only.
    pub created_at_ms: u64,
}

impl LockMarker {
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}
