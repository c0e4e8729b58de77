//! Cache storage backends.

use crate::errors::{ExError, ExErrorKind, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Keyed byte storage for persisted baselines.
///
/// Implementations decide where bytes live; the snapshot store owns the
/// encoding. Controllers sharing a cache name must serialize their
/// read/write cycles externally: backends do not lock across calls.
pub trait CacheBackend: Send + Sync {
    /// Read the bytes stored under `name`; `None` if nothing is stored.
    fn read_cache(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `name`.
    fn write_cache(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Delete one cache, or every cache when `name` is `None`.
    ///
    /// Deleting a cache that does not exist succeeds.
    fn delete_cache(&self, name: Option<&str>) -> Result<()>;

    /// Names of every stored cache, sorted.
    fn cache_names(&self) -> Result<Vec<String>>;
}

/// Process-local backend; contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    caches: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.caches.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("memory_cache")
                .with_message("cache mutex poisoned")
        })
    }
}

impl CacheBackend for MemoryCacheBackend {
    fn read_cache(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn write_cache(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.lock()?.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete_cache(&self, name: Option<&str>) -> Result<()> {
        let mut caches = self.lock()?;
        match name {
            Some(name) => {
                caches.remove(name);
            }
            None => caches.clear(),
        }
        Ok(())
    }

    fn cache_names(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_delete_one_and_all() {
        let backend = MemoryCacheBackend::new();
        backend.write_cache("a", b"1").unwrap();
        backend.write_cache("b", b"2").unwrap();

        backend.delete_cache(Some("a")).unwrap();
        assert_eq!(backend.read_cache("a").unwrap(), None);
        assert_eq!(backend.cache_names().unwrap(), vec!["b".to_string()]);

        backend.delete_cache(None).unwrap();
        assert!(backend.cache_names().unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_cache_is_ok() {
        let backend = MemoryCacheBackend::new();
        assert!(backend.delete_cache(Some("never-written")).is_ok());
    }
}
