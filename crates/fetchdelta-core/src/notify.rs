//! Change notification.
//!
//! [`ChangeObserver`] is the single integration point for consumers. Every
//! hook has an empty default body, so an observer implements only the hooks
//! it cares about.
//!
//! [`deliver`] frames one transition:
//! 1. `will_change` once, only for a non-empty script
//! 2. every section record, in script order
//! 3. every row record, in script order
//! 4. `did_change` once, paired with step 1
//!
//! An empty script produces no calls at all.

use crate::diff::model::{ChangeKind, ChangeScript, SectionChangeKind};
use crate::model::{IndexPath, SafeObject, SectionInfo};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// Receiver of change notifications.
pub trait ChangeObserver {
    fn will_change(&mut self) {}

    fn section_changed(
        &mut self,
        _section: &SectionInfo,
        _section_index: usize,
        _kind: SectionChangeKind,
    ) {
    }

    /// `index_path` is absent for inserts; `new_index_path` is present only
    /// for inserts and moves.
    fn object_changed(
        &mut self,
        _object: &SafeObject,
        _index_path: Option<IndexPath>,
        _kind: ChangeKind,
        _new_index_path: Option<IndexPath>,
    ) {
    }

    fn did_change(&mut self) {}
}

/// Shared observer handle, so the caller can keep inspecting an observer it
/// has handed to a controller. A poisoned lock is recovered, not skipped.
impl<O: ChangeObserver> ChangeObserver for Arc<Mutex<O>> {
    fn will_change(&mut self) {
        locked(&**self).will_change();
    }

    fn section_changed(&mut self, section: &SectionInfo, section_index: usize, kind: SectionChangeKind) {
        locked(&**self).section_changed(section, section_index, kind);
    }

    fn object_changed(
        &mut self,
        object: &SafeObject,
        index_path: Option<IndexPath>,
        kind: ChangeKind,
        new_index_path: Option<IndexPath>,
    ) {
        locked(&**self).object_changed(object, index_path, kind, new_index_path);
    }

    fn did_change(&mut self) {
        locked(&**self).did_change();
    }
}

fn locked<O>(shared: &Mutex<O>) -> MutexGuard<'_, O> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deliver `script` to `observer` under the framing contract above.
///
/// Returns the number of hook invocations made.
pub fn deliver(script: &ChangeScript, observer: &mut dyn ChangeObserver) -> usize {
    if script.is_empty() {
        return 0;
    }

    observer.will_change();
    for change in &script.section_changes {
        observer.section_changed(change.section(), change.section_index(), change.kind());
    }
    for change in &script.row_changes {
        observer.object_changed(
            change.object(),
            change.old_index_path(),
            change.kind(),
            change.new_index_path(),
        );
    }
    observer.did_change();

    script.len() + 2
}

/// One observed hook invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook", rename_all = "snake_case")]
pub enum Notification {
    WillChange,
    SectionChanged {
        section: SectionInfo,
        section_index: usize,
        kind: SectionChangeKind,
    },
    ObjectChanged {
        object: SafeObject,
        index_path: Option<IndexPath>,
        kind: ChangeKind,
        new_index_path: Option<IndexPath>,
    },
    DidChange,
}

/// Observer that records every notification in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub notifications: Vec<Notification>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain recorded notifications, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl ChangeObserver for RecordingObserver {
    fn will_change(&mut self) {
        self.notifications.push(Notification::WillChange);
    }

    fn section_changed(&mut self, section: &SectionInfo, section_index: usize, kind: SectionChangeKind) {
        self.notifications.push(Notification::SectionChanged {
            section: section.clone(),
            section_index,
            kind,
        });
    }

    fn object_changed(
        &mut self,
        object: &SafeObject,
        index_path: Option<IndexPath>,
        kind: ChangeKind,
        new_index_path: Option<IndexPath>,
    ) {
        self.notifications.push(Notification::ObjectChanged {
            object: object.clone(),
            index_path,
            kind,
            new_index_path,
        });
    }

    fn did_change(&mut self) {
        self.notifications.push(Notification::DidChange);
    }
}
