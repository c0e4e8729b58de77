//! Change script computation.
//!
//! The core entry point is [`compute_changes`], which compares a baseline
//! snapshot with a candidate snapshot and produces a [`ChangeScript`].
//!
//! This is a single pass of set difference plus a per-identifier comparison,
//! not an edit-distance search. A row whose index path changed only because
//! rows around it were inserted, deleted or moved gets no record.

use crate::diff::model::{ChangeRecord, ChangeScript, SectionChangeRecord};
use crate::model::{Attributes, FetchRequest, Snapshot};
use std::collections::{BTreeSet, HashSet};

/// Attribute keys whose change can relocate a row: the sort descriptor keys
/// plus the section key path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingKeys {
    keys: BTreeSet<String>,
}

impl OrderingKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_request(request: &FetchRequest, section_key_path: Option<&str>) -> Self {
        Self::new(request.sort_keys().chain(section_key_path))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn changed_between(&self, old: &Attributes, new: &Attributes) -> bool {
        self.keys.iter().any(|k| old.get(k) != new.get(k))
    }
}

/// Section-level records: deletes by ascending baseline ordinal, then
/// inserts by ascending candidate ordinal.
fn section_changes(baseline: &Snapshot, candidate: &Snapshot) -> Vec<SectionChangeRecord> {
    let old_names: HashSet<&str> = baseline.section_names().collect();
    let new_names: HashSet<&str> = candidate.section_names().collect();

    let deletes = baseline
        .sections()
        .iter()
        .enumerate()
        .filter(|(_, s)| !new_names.contains(s.name.as_str()))
        .map(|(i, s)| SectionChangeRecord::Delete {
            section: s.info(),
            section_index: i,
        });

    let inserts = candidate
        .sections()
        .iter()
        .enumerate()
        .filter(|(_, s)| !old_names.contains(s.name.as_str()))
        .map(|(i, s)| SectionChangeRecord::Insert {
            section: s.info(),
            section_index: i,
        });

    deletes.chain(inserts).collect()
}

/// Row-level records grouped deletes, inserts, moves, updates.
fn row_changes(baseline: &Snapshot, candidate: &Snapshot, keys: &OrderingKeys) -> Vec<ChangeRecord> {
    let mut deletes = Vec::new();
    let mut inserts = Vec::new();
    let mut moves = Vec::new();
    let mut updates = Vec::new();

    for (old_path, entry) in baseline.entries() {
        if !candidate.contains(&entry.identifier) {
            deletes.push(ChangeRecord::Delete {
                object: entry.to_safe_object(),
                old_index_path: old_path,
            });
        }
    }

    for (new_path, entry) in candidate.entries() {
        let old = baseline.lookup(&entry.identifier).and_then(|p| {
            baseline
                .section(p.section)
                .and_then(|s| s.entries.get(p.row).map(|e| (p, s.name.as_str(), &e.attributes)))
        });

        match old {
            None => inserts.push(ChangeRecord::Insert {
                object: entry.to_safe_object(),
                new_index_path: new_path,
            }),
            Some((old_path, old_section, old_attrs)) => {
                // Section ordinals shift when sections come and go; placement is by name.
                let new_section = candidate
                    .section(new_path.section)
                    .map(|s| s.name.as_str())
                    .unwrap_or_default();
                let relocated = old_section != new_section || old_path.row != new_path.row;

                if relocated && keys.changed_between(old_attrs, &entry.attributes) {
                    moves.push(ChangeRecord::Move {
                        object: entry.to_safe_object(),
                        old_index_path: old_path,
                        new_index_path: new_path,
                    });
                } else if *old_attrs != entry.attributes {
                    updates.push(ChangeRecord::Update {
                        object: entry.to_safe_object(),
                        index_path: new_path,
                    });
                }
            }
        }
    }

    let mut out = deletes;
    out.append(&mut inserts);
    out.append(&mut moves);
    out.append(&mut updates);
    out
}

/// Compute the ordered change script from `baseline` to `candidate`.
///
/// `keys` names the attributes that participate in sorting or sectioning;
/// only a change to one of them can produce a `Move`, and only when the row
/// lands in a different section (by name) or at a different rank.
pub fn compute_changes(baseline: &Snapshot, candidate: &Snapshot, keys: &OrderingKeys) -> ChangeScript {
    let script = ChangeScript {
        section_changes: section_changes(baseline, candidate),
        row_changes: row_changes(baseline, candidate, keys),
    };

    tracing::debug!(
        baseline_len = baseline.len(),
        candidate_len = candidate.len(),
        section_change_count = script.section_changes.len(),
        row_change_count = script.row_changes.len(),
        "Computed change script"
    );

    script
}
