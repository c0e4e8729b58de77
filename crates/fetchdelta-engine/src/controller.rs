//! Fetched results controller.
//!
//! ## Fetch pipeline (in order):
//! 1. Load the cached baseline (first fetch only, named caches only)
//! 2. Execute the request against the source (hard stop on failure)
//! 3. Section the result (hard stop on a duplicate identifier)
//! 4. Diff baseline against candidate
//! 5. Deliver the change script to the observer
//! 6. Replace the baseline with the candidate
//! 7. Persist the new baseline (failure is logged, not returned)
//!
//! Steps 2 and 3 leave the baseline untouched when they fail.

#![allow(clippy::result_large_err)]

use crate::source::FetchSource;
use fetchdelta_core::cache::SnapshotStore;
use fetchdelta_core::diff::{compute_changes, ChangeScript, OrderingKeys};
use fetchdelta_core::errors::{ExError, Result};
use fetchdelta_core::model::{FetchRequest, Identifier, IndexPath, SafeObject, SectionInfo, Snapshot};
use fetchdelta_core::notify::{deliver, ChangeObserver};
use fetchdelta_core::resolve;
use fetchdelta_core::sectioning::SectionAggregator;
use fetchdelta_core::{log_op_end, log_op_error, log_op_start};
use fetchdelta_core_types::RequestId;
use std::sync::Arc;
use std::time::Instant;

/// Where a controller keeps its baseline between runs.
#[derive(Debug, Clone)]
pub enum CacheBinding {
    /// Baseline lives only in the controller.
    Ephemeral,
    /// Baseline is loaded from and persisted to `store` under `name`.
    Named { name: String, store: SnapshotStore },
}

impl CacheBinding {
    pub fn named(store: SnapshotStore, name: impl Into<String>) -> Self {
        CacheBinding::Named {
            name: name.into(),
            store,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CacheBinding::Ephemeral => None,
            CacheBinding::Named { name, .. } => Some(name),
        }
    }
}

/// Result of one successful `perform_fetch`.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub request_id: RequestId,
    /// The script that was delivered (empty when nothing changed).
    pub script: ChangeScript,
    /// Whether the new baseline reached the cache. Always `false` for an
    /// ephemeral binding.
    pub persisted: bool,
}

/// Tracks the ordered, sectioned result of one fetch request and reports
/// how it changes between fetches.
///
/// Accessors read the current baseline: the last successful fetch, or the
/// cached baseline once it has been loaded.
pub struct FetchedResultsController {
    source: Arc<dyn FetchSource>,
    request: FetchRequest,
    aggregator: SectionAggregator,
    ordering: OrderingKeys,
    cache: CacheBinding,
    observer: Option<Box<dyn ChangeObserver + Send>>,
    baseline: Snapshot,
    baseline_loaded: bool,
}

impl std::fmt::Debug for FetchedResultsController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedResultsController")
            .field("request", &self.request)
            .field("section_key_path", &self.aggregator.key_path())
            .field("cache", &self.cache.name())
            .field("rows", &self.baseline.len())
            .finish_non_exhaustive()
    }
}

impl FetchedResultsController {
    pub fn new(
        source: Arc<dyn FetchSource>,
        request: FetchRequest,
        section_key_path: Option<String>,
        cache: CacheBinding,
    ) -> Self {
        let ordering = OrderingKeys::from_request(&request, section_key_path.as_deref());
        let aggregator = SectionAggregator::new(section_key_path);
        let baseline = aggregator.empty_snapshot();
        Self {
            source,
            request,
            aggregator,
            ordering,
            cache,
            observer: None,
            baseline,
            baseline_loaded: false,
        }
    }

    /// Register the observer for subsequent fetches, replacing any previous
    /// one. `None` unregisters.
    pub fn set_observer(&mut self, observer: Option<Box<dyn ChangeObserver + Send>>) {
        self.observer = observer;
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    pub fn section_key_path(&self) -> Option<&str> {
        self.aggregator.key_path()
    }

    pub fn cache_name(&self) -> Option<&str> {
        self.cache.name()
    }

    /// Fetch, diff against the baseline, notify, then persist.
    ///
    /// # Errors
    ///
    /// `QueryFailure` if the source fails, `DuplicateIdentifier` if it
    /// returns an identifier twice. In both cases nothing is delivered and
    /// the baseline is unchanged.
    pub fn perform_fetch(&mut self) -> Result<FetchOutcome> {
        let start = Instant::now();
        let request_id = RequestId::new();
        let cache_name = self.cache.name().unwrap_or_default().to_string();
        log_op_start!(
            "perform_fetch",
            request_id = request_id.as_str(),
            cache_name = cache_name.as_str(),
            entity = self.request.entity.as_str()
        );

        let result = self.fetch_and_apply(&request_id).map_err(|e| {
            let e = e.with_op("perform_fetch").with_request_id(request_id.clone());
            match self.cache.name() {
                Some(name) => e.with_cache_name(name),
                None => e,
            }
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    "perform_fetch",
                    duration_ms = duration_ms,
                    request_id = request_id.as_str(),
                    cache_name = cache_name.as_str(),
                    object_count = self.baseline.len(),
                    section_count = self.baseline.number_of_sections(),
                    change_count = outcome.script.len(),
                    persisted = outcome.persisted
                );
            }
            Err(err) => {
                log_op_error!(
                    "perform_fetch",
                    err.clone(),
                    duration_ms = duration_ms,
                    request_id = request_id.as_str(),
                    cache_name = cache_name.as_str()
                );
            }
        }
        result
    }

    fn fetch_and_apply(&mut self, request_id: &RequestId) -> Result<FetchOutcome> {
        self.ensure_baseline_loaded();

        let objects = self.source.execute(&self.request)?;
        let candidate = self
            .aggregator
            .aggregate(objects)
            .map_err(|e| ExError::from(e).with_entity(self.request.entity.clone()))?;

        let script = compute_changes(&self.baseline, &candidate, &self.ordering);
        if let Some(observer) = self.observer.as_mut() {
            deliver(&script, observer.as_mut());
        }
        self.baseline = candidate;

        let persisted = self.persist_baseline(request_id);
        Ok(FetchOutcome {
            request_id: request_id.clone(),
            script,
            persisted,
        })
    }

    fn ensure_baseline_loaded(&mut self) {
        if self.baseline_loaded {
            return;
        }
        if let CacheBinding::Named { name, store } = &self.cache {
            if let Some(cached) = store.load(name, self.aggregator.key_path()) {
                self.baseline = cached;
            }
        }
        self.baseline_loaded = true;
    }

    fn persist_baseline(&self, request_id: &RequestId) -> bool {
        let CacheBinding::Named { name, store } = &self.cache else {
            return false;
        };
        match store.persist(name, self.aggregator.key_path(), &self.baseline) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    request_id = request_id.as_str(),
                    cache_name = name.as_str(),
                    err_code = err.code(),
                    error = %err,
                    "Failed to persist baseline; in-memory baseline still advanced"
                );
                false
            }
        }
    }

    /// Forget the baseline so the next fetch reports every row as an insert.
    ///
    /// The cache is not consulted again; the next successful fetch
    /// overwrites it.
    pub fn reset(&mut self) {
        self.baseline = self.aggregator.empty_snapshot();
        self.baseline_loaded = true;
        tracing::debug!(cache_name = self.cache.name().unwrap_or_default(), "Controller reset");
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.baseline
    }

    pub fn number_of_sections(&self) -> usize {
        self.baseline.number_of_sections()
    }

    /// Rows in `section`, or `None` if it is out of range.
    pub fn number_of_rows(&self, section: usize) -> Option<usize> {
        self.baseline.section(section).map(|s| s.number_of_objects())
    }

    /// Section name at `section`; `""` in single-section mode.
    pub fn title(&self, section: usize) -> Option<&str> {
        self.baseline.section(section).map(|s| s.name.as_str())
    }

    pub fn object_at(&self, index_path: IndexPath) -> Option<SafeObject> {
        resolve::object_at(&self.baseline, index_path).map(|e| e.to_safe_object())
    }

    pub fn index_path_of(&self, identifier: &Identifier) -> Option<IndexPath> {
        resolve::index_path_of(&self.baseline, identifier)
    }

    pub fn sections(&self) -> Vec<SectionInfo> {
        self.baseline.sections().iter().map(|s| s.info()).collect()
    }

    /// Every object in section-then-row order.
    pub fn fetched_objects(&self) -> Vec<SafeObject> {
        self.baseline
            .entries()
            .map(|(_, entry)| entry.to_safe_object())
            .collect()
    }

    /// Delete one named cache, or every cache when `name` is `None`.
    ///
    /// Controllers that already loaded a deleted cache keep their in-memory
    /// baseline; callers must not delete a cache a live controller uses.
    ///
    /// # Errors
    ///
    /// Whatever the store's backend reports.
    pub fn delete_cache(store: &SnapshotStore, name: Option<&str>) -> Result<()> {
        store.delete(name)
    }
}
