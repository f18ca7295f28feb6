//! Owner identity for lock entries.

use std::fmt;

use uuid::Uuid;

use crate::error::{LockError, LockResult};

/// Longest owner id accepted by [`OwnerId::new`].
pub const MAX_OWNER_ID_LENGTH: usize = 128;

/// Opaque token identifying the process (and lock instance) that created an
/// entry.
///
/// Generated once per provider from a random instance token, then suffixed
/// with a counter for every lock the provider hands out, so restarts and
/// sibling locks in one process never share an id. Only ASCII alphanumerics
/// and `-` are allowed, which keeps the entry separator unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wraps an explicit owner id.
    pub fn new(id: impl Into<String>) -> LockResult<Self> {
        let id = id.into();
        if is_valid_owner_id(&id) {
            Ok(Self(id))
        } else {
            Err(LockError::InvalidName(format!(
                "owner id '{id}' must be 1-{MAX_OWNER_ID_LENGTH} characters of [A-Za-z0-9-]"
            )))
        }
    }

    /// Generates a fresh random instance token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Derives the id of the `index`th lock created under this instance token.
    pub fn child(&self, index: u64) -> Self {
        Self(format!("{}-{index}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub(crate) fn is_valid_owner_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_OWNER_ID_LENGTH
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
