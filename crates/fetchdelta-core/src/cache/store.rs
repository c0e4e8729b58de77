//! Snapshot store: named, persisted baselines.
//!
//! Loading never fails. A cache that is missing, unreadable, corrupt,
//! written by another schema version or built with another section rule is
//! reported as absent, which makes the next diff a full rebuild.
//!
//! Deleting a cache does not invalidate controllers that already loaded it.
//! Callers must make sure no live controller still relies on a cache they
//! delete; deleting every cache is best done at process startup.

#![allow(clippy::result_large_err)]

use crate::cache::backend::{CacheBackend, MemoryCacheBackend};
use crate::cache::codec::{self, CacheEnvelope};
use crate::errors::{ExError, ExErrorKind, FetchDeltaError, Result};
use crate::model::Snapshot;
use crate::{log_op_end, log_op_error, log_op_start};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct SnapshotStore {
    backend: Arc<dyn CacheBackend>,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore").finish_non_exhaustive()
    }
}

impl SnapshotStore {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Store over a fresh [`MemoryCacheBackend`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCacheBackend::new()))
    }

    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    /// Load the baseline stored under `name` for the given section rule.
    pub fn load(&self, name: &str, section_key_path: Option<&str>) -> Option<Snapshot> {
        match self.try_load(name, section_key_path) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(
                    cache_name = name,
                    err_code = err.code(),
                    error = %err,
                    "Cache unreadable, treating baseline as empty"
                );
                None
            }
        }
    }

    fn try_load(&self, name: &str, section_key_path: Option<&str>) -> Result<Option<Snapshot>> {
        let Some(bytes) = self.backend.read_cache(name)? else {
            tracing::debug!(cache_name = name, "No cache stored");
            return Ok(None);
        };

        let snapshot = codec::decode(&bytes, section_key_path).map_err(|e| unreadable(name, e))?;

        tracing::debug!(
            cache_name = name,
            size_bytes = bytes.len(),
            section_count = snapshot.number_of_sections(),
            "Loaded cached baseline"
        );
        Ok(Some(snapshot))
    }

    /// Read the raw envelope under `name`, verifying version and digest but
    /// not the section rule.
    ///
    /// # Errors
    ///
    /// `CacheUnreadable` for damaged data; backend errors pass through.
    pub fn inspect(&self, name: &str) -> Result<Option<CacheEnvelope>> {
        match self.backend.read_cache(name)? {
            None => Ok(None),
            Some(bytes) => codec::decode_envelope(&bytes)
                .map(Some)
                .map_err(|e| unreadable(name, e)),
        }
    }

    /// Replace the baseline stored under `name`.
    ///
    /// # Errors
    ///
    /// `Serialization` if encoding fails, otherwise whatever the backend
    /// reports.
    pub fn persist(&self, name: &str, section_key_path: Option<&str>, snapshot: &Snapshot) -> Result<()> {
        let start = Instant::now();
        log_op_start!("persist_snapshot", cache_name = name);

        let result = codec::encode(name, section_key_path, snapshot)
            .map_err(|e| ExError::from(e).with_op("persist_snapshot").with_cache_name(name))
            .and_then(|bytes| self.backend.write_cache(name, &bytes));

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!("persist_snapshot", duration_ms = duration_ms, cache_name = name);
            }
            Err(err) => {
                log_op_error!("persist_snapshot", err.clone(), duration_ms = duration_ms, cache_name = name);
            }
        }
        result
    }

    /// Delete one cache, or all caches when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Whatever the backend reports.
    pub fn delete(&self, name: Option<&str>) -> Result<()> {
        let start = Instant::now();
        let target = name.unwrap_or("*");
        log_op_start!("delete_cache", cache_name = target);

        let result = self.backend.delete_cache(name);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!("delete_cache", duration_ms = duration_ms, cache_name = target);
            }
            Err(err) => {
                log_op_error!("delete_cache", err.clone(), duration_ms = duration_ms, cache_name = target);
            }
        }
        result
    }

    /// # Errors
    ///
    /// Whatever the backend reports.
    pub fn cache_names(&self) -> Result<Vec<String>> {
        self.backend.cache_names()
    }
}

fn unreadable(name: &str, err: FetchDeltaError) -> ExError {
    ExError::new(ExErrorKind::CacheUnreadable)
        .with_op("load_snapshot")
        .with_cache_name(name)
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cache_loads_as_none() {
        let store = SnapshotStore::in_memory();
        assert!(store.load("nothing-here", None).is_none());
        assert!(store.inspect("nothing-here").unwrap().is_none());
    }

    #[test]
    fn test_garbage_bytes_load_as_none() {
        let store = SnapshotStore::in_memory();
        store.backend().write_cache("junk", b"not json").unwrap();
        assert!(store.load("junk", None).is_none());

        let err = store.inspect("junk").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::CacheUnreadable);
        assert_eq!(err.cache_name(), Some("junk"));
    }
}
