//! Store configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! [cache]
//! backend = "sqlite"   # "fs" | "sqlite" | "memory"
//! root = ".fetchdelta/cache"
//!
//! [logging]
//! profile = "production"
//! ```
//!
//! Every field has a default, so an empty or missing file is valid.

#![allow(clippy::result_large_err)]

use crate::errors::{config_error, io_error, Result};
use crate::fs::FsCacheBackend;
use crate::sqlite_backend::SqliteCacheBackend;
use fetchdelta_core::cache::{CacheBackend, MemoryCacheBackend, SnapshotStore};
use fetchdelta_core::logging_facility::Profile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Default cache directory, relative to the working directory
pub const DEFAULT_CACHE_ROOT: &str = ".fetchdelta/cache";

/// Database file used by the SQLite backend inside the cache root
pub const SQLITE_FILE_NAME: &str = "caches.sqlite3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Fs,
    Sqlite,
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fs" => Ok(BackendKind::Fs),
            "sqlite" => Ok(BackendKind::Sqlite),
            "memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub backend: BackendKind,
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            root: PathBuf::from(DEFAULT_CACHE_ROOT),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

impl StoreConfig {
    /// # Errors
    ///
    /// `InvalidInput` if the text is not valid TOML for this schema.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(format!("Invalid config: {}", e)))
    }

    /// Load from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// `Io` if the file exists but cannot be read, `InvalidInput` if it does
    /// not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text).map_err(|e| {
                let message = format!("{}: {}", path.display(), e.message());
                e.with_message(message)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(io_error("load_config", e)),
        }
    }

    /// Open the configured backend.
    ///
    /// # Errors
    ///
    /// Whatever opening the backend reports (SQLite open or migration
    /// failures).
    pub fn open_backend(&self) -> Result<Arc<dyn CacheBackend>> {
        let backend: Arc<dyn CacheBackend> = match self.cache.backend {
            BackendKind::Fs => Arc::new(FsCacheBackend::new(&self.cache.root)),
            BackendKind::Sqlite => Arc::new(SqliteCacheBackend::open(
                self.cache.root.join(SQLITE_FILE_NAME),
            )?),
            BackendKind::Memory => Arc::new(MemoryCacheBackend::new()),
        };
        tracing::debug!(backend = ?self.cache.backend, root = %self.cache.root.display(), "Opened cache backend");
        Ok(backend)
    }

    /// [`SnapshotStore`] over the configured backend.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::open_backend`].
    pub fn open_store(&self) -> Result<SnapshotStore> {
        Ok(SnapshotStore::new(self.open_backend()?))
    }
}
