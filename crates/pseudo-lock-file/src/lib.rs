//! Directory-backed object store for pseudo-locks.
//!
//! Each object is a file below a root directory; `/` in object names maps
//! to subdirectories. Intended for filesystems shared between hosts (NFS,
//! SMB, FUSE-mounted buckets) where OS file locks are unreliable.

pub mod name;
pub mod store;

pub use store::FileObjectStore;
