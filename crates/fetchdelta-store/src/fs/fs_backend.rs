//! Filesystem-based cache backend
//!
//! Stores each cache as `<root>/<escaped-name>.cache.json`

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use crate::fs::atomic::atomic_write;
use crate::fs::naming::{cache_file_name, cache_name_from_file};
use fetchdelta_core::cache::CacheBackend;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Filesystem cache backend
#[derive(Debug, Clone)]
pub struct FsCacheBackend {
    root: PathBuf,
}

impl FsCacheBackend {
    /// Create a backend rooted at `root`; the directory is created lazily
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the file holding `cache_name`
    pub fn cache_path(&self, cache_name: &str) -> PathBuf {
        self.root.join(cache_file_name(cache_name))
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete_cache", e)),
        }
    }

    fn cache_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_caches", e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_caches", e))?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str().and_then(cache_name_from_file) else {
                continue;
            };
            files.push((name, entry.path()));
        }
        files.sort();
        Ok(files)
    }
}

impl CacheBackend for FsCacheBackend {
    fn read_cache(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.cache_path(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read_cache", e).with_cache_name(name)),
        }
    }

    fn write_cache(&self, name: &str, payload: &[u8]) -> Result<()> {
        let path = self.cache_path(name);
        atomic_write(&path, payload).map_err(|e| e.with_cache_name(name))?;
        tracing::debug!(cache_name = name, path = %path.display(), size_bytes = payload.len(), "Wrote cache file");
        Ok(())
    }

    fn delete_cache(&self, name: Option<&str>) -> Result<()> {
        match name {
            Some(name) => self.remove(&self.cache_path(name)),
            None => {
                for (_, path) in self.cache_files()? {
                    self.remove(&path)?;
                }
                Ok(())
            }
        }
    }

    fn cache_names(&self) -> Result<Vec<String>> {
        Ok(self.cache_files()?.into_iter().map(|(name, _)| name).collect())
    }
}
