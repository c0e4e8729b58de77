//! fetchdelta core - sectioned result snapshots and change scripts
//!
//! This crate provides the engine pieces of a fetched-results controller:
//! - Value-identified snapshot model (identifiers, entries, sections)
//! - Section aggregation of an ordered fetch result
//! - Heuristic diff producing ordered section and row change records
//! - Index path resolution against a snapshot
//! - Framed change notification through an optional-hook observer
//! - Named, persisted baselines over pluggable cache backends
//! - Structured errors and logging shared by the other crates

pub mod cache;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod notify;
pub mod resolve;
pub mod sectioning;

/// Re-exported so the logging macros resolve schema constants through `$crate`.
pub use fetchdelta_core_types as core_types;

// Re-export commonly used types
pub use cache::{CacheBackend, MemoryCacheBackend, SnapshotStore};
pub use diff::{compute_changes, ChangeKind, ChangeRecord, ChangeScript, OrderingKeys};
pub use errors::{ExError, ExErrorKind, FetchDeltaError, Result};
pub use model::{FetchRequest, Identifier, IndexPath, SafeObject, Snapshot, SortDescriptor};
pub use notify::{deliver, ChangeObserver, Notification, RecordingObserver};
pub use sectioning::SectionAggregator;
