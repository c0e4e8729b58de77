//! fetchdelta store - durable cache backends and configuration
//!
//! Provides:
//! - Filesystem backend with atomic temp->rename writes
//! - SQLite backend with an embedded migrations framework
//! - TOML configuration selecting and opening a backend

pub mod config;
pub mod db;
pub mod errors;
pub mod fs;
pub mod migrations;
pub mod sqlite_backend;

// Re-export key types
pub use config::{BackendKind, StoreConfig};
pub use errors::Result;
pub use fs::FsCacheBackend;
pub use sqlite_backend::SqliteCacheBackend;
