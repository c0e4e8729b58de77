//! Change script types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq` so a
//! script can be logged, printed by the CLI, or compared in tests.

use crate::model::{Identifier, IndexPath, SafeObject, SectionInfo};
use serde::{Deserialize, Serialize};

/// Kind of a row-level change, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Delete,
    Move,
    Update,
}

/// Kind of a section-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionChangeKind {
    Insert,
    Delete,
}

/// A row-level change.
///
/// `Insert` and `Move` destinations are candidate index paths; `Delete` and
/// `Move` sources are baseline index paths. Only the directly affected row is
/// recorded; shifts of its neighbours are implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeRecord {
    Insert {
        object: SafeObject,
        new_index_path: IndexPath,
    },
    Delete {
        object: SafeObject,
        old_index_path: IndexPath,
    },
    /// The changed row is assumed updated too; no separate `Update` follows.
    Move {
        object: SafeObject,
        old_index_path: IndexPath,
        new_index_path: IndexPath,
    },
    Update {
        object: SafeObject,
        index_path: IndexPath,
    },
}

impl ChangeRecord {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeRecord::Insert { .. } => ChangeKind::Insert,
            ChangeRecord::Delete { .. } => ChangeKind::Delete,
            ChangeRecord::Move { .. } => ChangeKind::Move,
            ChangeRecord::Update { .. } => ChangeKind::Update,
        }
    }

    pub fn object(&self) -> &SafeObject {
        match self {
            ChangeRecord::Insert { object, .. }
            | ChangeRecord::Delete { object, .. }
            | ChangeRecord::Move { object, .. }
            | ChangeRecord::Update { object, .. } => object,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.object().identifier
    }

    /// Path the observer receives as `index_path` (absent for inserts).
    pub fn old_index_path(&self) -> Option<IndexPath> {
        match self {
            ChangeRecord::Insert { .. } => None,
            ChangeRecord::Delete { old_index_path, .. }
            | ChangeRecord::Move { old_index_path, .. } => Some(*old_index_path),
            ChangeRecord::Update { index_path, .. } => Some(*index_path),
        }
    }

    /// Destination path; present only for inserts and moves.
    pub fn new_index_path(&self) -> Option<IndexPath> {
        match self {
            ChangeRecord::Insert { new_index_path, .. }
            | ChangeRecord::Move { new_index_path, .. } => Some(*new_index_path),
            ChangeRecord::Delete { .. } | ChangeRecord::Update { .. } => None,
        }
    }
}

/// A section-level change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionChangeRecord {
    /// `section_index` is the candidate ordinal
    Insert {
        section: SectionInfo,
        section_index: usize,
    },
    /// `section_index` is the baseline ordinal
    Delete {
        section: SectionInfo,
        section_index: usize,
    },
}

impl SectionChangeRecord {
    pub fn kind(&self) -> SectionChangeKind {
        match self {
            SectionChangeRecord::Insert { .. } => SectionChangeKind::Insert,
            SectionChangeRecord::Delete { .. } => SectionChangeKind::Delete,
        }
    }

    pub fn section(&self) -> &SectionInfo {
        match self {
            SectionChangeRecord::Insert { section, .. }
            | SectionChangeRecord::Delete { section, .. } => section,
        }
    }

    pub fn section_index(&self) -> usize {
        match self {
            SectionChangeRecord::Insert { section_index, .. }
            | SectionChangeRecord::Delete { section_index, .. } => *section_index,
        }
    }
}

/// Full ordered output of one diff pass: section records, then row records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeScript {
    pub section_changes: Vec<SectionChangeRecord>,
    pub row_changes: Vec<ChangeRecord>,
}

impl ChangeScript {
    pub fn is_empty(&self) -> bool {
        self.section_changes.is_empty() && self.row_changes.is_empty()
    }

    /// Total number of records (section and row).
    pub fn len(&self) -> usize {
        self.section_changes.len() + self.row_changes.len()
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.row_changes.iter().filter(|c| c.kind() == kind).count()
    }

    pub fn count_sections(&self, kind: SectionChangeKind) -> usize {
        self.section_changes
            .iter()
            .filter(|c| c.kind() == kind)
            .count()
    }
}
