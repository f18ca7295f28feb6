//! Object name validation and conversion to paths.

use std::path::{Path, PathBuf};

use pseudo_lock_core::error::{StoreError, StoreResult};

/// Separator between directory levels in object names.
pub const NAME_SEPARATOR: char = '/';

/// Longest single path segment most filesystems accept.
const MAX_SEGMENT_LENGTH: usize = 255;

/// Maps an object name to its path below `root`.
///
/// # Rules
///
/// - The name is split on `/`; every segment becomes one path component
/// - Segments must be non-empty and at most 255 bytes
/// - Segments must not start with `.`, which keeps `.`/`..` out and reserves
///   hidden files for in-flight writes
/// - Backslashes and NUL bytes are rejected so names stay portable
pub fn object_path(root: &Path, name: &str) -> StoreResult<PathBuf> {
    if name.is_empty() {
        return Err(StoreError::InvalidName("object name cannot be empty".to_string()));
    }

    let mut path = root.to_path_buf();
    for segment in name.split(NAME_SEPARATOR) {
        validate_segment(name, segment)?;
        path.push(segment);
    }
    Ok(path)
}

/// Path of the hidden file an object is written to before being renamed
/// into place.
pub fn staging_path(path: &Path) -> StoreResult<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| StoreError::InvalidName(format!("'{}' has no file name", path.display())))?;
    Ok(path.with_file_name(format!(".{file_name}.tmp")))
}

/// Whether a directory entry may belong to an object.
pub fn is_object_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.starts_with('.')
}

fn validate_segment(name: &str, segment: &str) -> StoreResult<()> {
    if segment.is_empty() {
        return Err(StoreError::InvalidName(format!(
            "object name '{name}' contains an empty path segment"
        )));
    }
    if segment.starts_with('.') {
        return Err(StoreError::InvalidName(format!(
            "object name '{name}' contains a segment starting with '.'"
        )));
    }
    if segment.len() > MAX_SEGMENT_LENGTH {
        return Err(StoreError::InvalidName(format!(
            "object name '{name}' has a segment longer than {MAX_SEGMENT_LENGTH} bytes"
        )));
    }
    if segment.contains(['\\', '\0']) {
        return Err(StoreError::InvalidName(format!(
            "object name '{name}' contains a backslash or NUL byte"
        )));
    }
    Ok(())
}
