//! Lock entry naming.
//!
//! Every acquire attempt is represented by one marker object named
//!
//! ```text
//! {prefix}_{sequence:020}_{owner}
//! ```
//!
//! The sequence is zero-padded to the width of `u64::MAX`, so plain byte
//! ordering of names under one prefix equals ordering by `(sequence, owner)`.
//! That ordering alone decides who holds the lock.

use std::fmt;

use crate::error::{LockError, LockResult, MalformedEntryError};
use crate::owner::{OwnerId, is_valid_owner_id};

/// Separator between prefix, sequence and owner.
pub const ENTRY_SEPARATOR: char = '_';

/// Number of decimal digits in an encoded sequence.
pub const SEQUENCE_WIDTH: usize = 20;

/// Longest lock prefix accepted by [`validate_prefix`].
pub const MAX_PREFIX_LENGTH: usize = 512;

/// One marker object in the store.
///
/// Derived ordering compares `prefix`, then `sequence`, then `owner`, which
/// for entries of one prefix matches the byte order of their names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LockEntry {
    /// The logical lock this entry competes for.
    pub prefix: String,
    /// Ordering value; smaller sequences are older requests.
    pub sequence: u64,
    /// Creator of the entry.
    pub owner: OwnerId,
}

impl LockEntry {
    pub fn new(prefix: impl Into<String>, sequence: u64, owner: OwnerId) -> Self {
        Self {
            prefix: prefix.into(),
            sequence,
            owner,
        }
    }

    /// Returns the storage object name for this entry.
    pub fn object_name(&self) -> String {
        encode(&self.prefix, self.sequence, &self.owner)
    }

    /// Parses a storage object name.
    pub fn parse(name: &str) -> Result<Self, MalformedEntryError> {
        decode(name)
    }
}

impl fmt::Display for LockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.object_name())
    }
}

/// Encodes an entry into its object name.
pub fn encode(prefix: &str, sequence: u64, owner: &OwnerId) -> String {
    format!(
        "{prefix}{ENTRY_SEPARATOR}{sequence:0width$}{ENTRY_SEPARATOR}{owner}",
        width = SEQUENCE_WIDTH
    )
}

/// Decodes an object name produced by [`encode`].
///
/// Anything else, including unrelated objects sharing the prefix, yields a
/// [`MalformedEntryError`].
pub fn decode(name: &str) -> Result<LockEntry, MalformedEntryError> {
    let (rest, owner) = name
        .rsplit_once(ENTRY_SEPARATOR)
        .ok_or_else(|| MalformedEntryError::new(name, "missing owner separator"))?;
    let (prefix, sequence) = rest
        .rsplit_once(ENTRY_SEPARATOR)
        .ok_or_else(|| MalformedEntryError::new(name, "missing sequence separator"))?;

    if prefix.is_empty() {
        return Err(MalformedEntryError::new(name, "empty prefix"));
    }
    if sequence.len() != SEQUENCE_WIDTH || !sequence.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MalformedEntryError::new(
            name,
            "sequence is not a 20 digit number",
        ));
    }
    let sequence = sequence
        .parse::<u64>()
        .map_err(|_| MalformedEntryError::new(name, "sequence out of range"))?;
    if !is_valid_owner_id(owner) {
        return Err(MalformedEntryError::new(name, "invalid owner id"));
    }

    Ok(LockEntry {
        prefix: prefix.to_string(),
        sequence,
        owner: OwnerId::new(owner).map_err(|_| MalformedEntryError::new(name, "invalid owner id"))?,
    })
}

/// The listing prefix covering every entry of `prefix`.
///
/// Includes the separator so that `locks/config` does not pick up entries of
/// `locks/configuration`.
pub fn listing_prefix(prefix: &str) -> String {
    format!("{prefix}{ENTRY_SEPARATOR}")
}

/// Checks that `prefix` can be used as a lock prefix.
pub fn validate_prefix(prefix: &str) -> LockResult<()> {
    if prefix.is_empty() {
        return Err(LockError::InvalidName(
            "lock prefix cannot be empty".to_string(),
        ));
    }
    if prefix.len() > MAX_PREFIX_LENGTH {
        return Err(LockError::InvalidName(format!(
            "lock prefix is longer than {MAX_PREFIX_LENGTH} bytes"
        )));
    }
    if prefix.chars().any(char::is_control) {
        return Err(LockError::InvalidName(format!(
            "lock prefix '{}' contains control characters",
            prefix.escape_debug()
        )));
    }
    Ok(())
}
