//! Directory-backed object store implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pseudo_lock_core::error::{StoreError, StoreResult};
use pseudo_lock_core::traits::ObjectStore;
use tokio::fs;
use tracing::{trace, warn};

use crate::name::{NAME_SEPARATOR, is_object_segment, object_path, staging_path};

/// Object store keeping one file per object below a root directory.
///
/// Objects are written to a hidden staging file and renamed into place, so a
/// listing never returns a half-written object.
#[derive(Debug, Clone)]
pub struct FileObjectStore {
    root: PathBuf,
}

impl FileObjectStore {
    /// Opens a store rooted at `root`.
    ///
    /// The directory will be created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(map_io)?;
        Ok(Self { root })
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file backing the object `name`.
    pub fn object_path(&self, name: &str) -> StoreResult<PathBuf> {
        object_path(&self.root, name)
    }
}

impl ObjectStore for FileObjectStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn create(&self, name: &str, contents: Vec<u8>) -> StoreResult<()> {
        let path = self.object_path(name)?;
        let staging = staging_path(&path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(map_io)?;
        }

        fs::write(&staging, contents).await.map_err(map_io)?;
        if let Err(e) = fs::rename(&staging, &path).await {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                warn!(path = %staging.display(), error = %cleanup, "failed to remove staging file");
            }
            return Err(map_io(e));
        }
        trace!(object = name, "file store create");
        Ok(())
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.object_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                trace!(object = name, "file store delete");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(e)),
        }
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        // Start in the deepest directory the prefix names in full.
        let (start, base) = match prefix.rsplit_once(NAME_SEPARATOR) {
            Some((dir, _)) => (
                self.object_path(dir)?,
                format!("{dir}{NAME_SEPARATOR}"),
            ),
            None => (self.root.clone(), String::new()),
        };

        let mut names = Vec::new();
        let mut pending = vec![(start, base)];
        while let Some((dir, base)) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(map_io(e)),
            };

            while let Some(entry) = entries.next_entry().await.map_err(map_io)? {
                let file_name = entry.file_name();
                let Some(segment) = file_name.to_str() else {
                    continue;
                };
                if !is_object_segment(segment) {
                    continue;
                }

                let name = format!("{base}{segment}");
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    // Deleted since the directory was read.
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(map_io(e)),
                };

                if file_type.is_dir() {
                    let nested = format!("{name}{NAME_SEPARATOR}");
                    if nested.starts_with(prefix) {
                        pending.push((entry.path(), nested));
                    }
                } else if name.starts_with(prefix) {
                    names.push(name);
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

fn map_io(e: std::io::Error) -> StoreError {
    match e.kind() {
        ErrorKind::PermissionDenied => StoreError::Denied(e.to_string()),
        _ => StoreError::Io(e),
    }
}
