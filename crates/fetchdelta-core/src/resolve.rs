//! Index path resolution against a snapshot.
//!
//! Misses are `None`, never errors. Results are only meaningful for the
//! snapshot they were computed on: resolving against a snapshot that has
//! since been superseded is a caller error and is not detected.

use crate::model::{Entry, Identifier, IndexPath, SectionInfo, Snapshot};

/// Locate `identifier` in `snapshot`.
pub fn index_path_of(snapshot: &Snapshot, identifier: &Identifier) -> Option<IndexPath> {
    snapshot.lookup(identifier)
}

/// Entry at `path`, or `None` if either index is out of range.
pub fn object_at(snapshot: &Snapshot, path: IndexPath) -> Option<&Entry> {
    snapshot
        .section(path.section)
        .and_then(|s| s.entries.get(path.row))
}

/// Identifier at `path`, or `None` if either index is out of range.
pub fn identifier_at(snapshot: &Snapshot, path: IndexPath) -> Option<&Identifier> {
    object_at(snapshot, path).map(|e| &e.identifier)
}

pub fn section_info(snapshot: &Snapshot, section_index: usize) -> Option<SectionInfo> {
    snapshot.section(section_index).map(|s| s.info())
}
