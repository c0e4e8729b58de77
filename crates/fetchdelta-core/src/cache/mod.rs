//! Persisted baselines
//!
//! Provides:
//! - [`CacheBackend`]: keyed byte storage (read/write/delete by name)
//! - [`MemoryCacheBackend`]: process-local backend
//! - [`SnapshotStore`]: load/persist/delete of snapshots over a backend
//! - [`codec`]: the versioned, digest-checked JSON envelope

pub mod backend;
pub mod codec;
pub mod store;

pub use backend::{CacheBackend, MemoryCacheBackend};
pub use codec::{CacheEnvelope, CACHE_SCHEMA_VERSION};
pub use store::SnapshotStore;
