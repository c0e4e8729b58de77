//! Filesystem cache backend
//!
//! Provides:
//! - One JSON file per cache under a root directory
//! - Atomic temp->rename writes
//! - Reversible file naming for arbitrary cache names

mod atomic;
mod fs_backend;
mod naming;

pub use fs_backend::FsCacheBackend;
pub use naming::{cache_file_name, cache_name_from_file, CACHE_FILE_SUFFIX};
