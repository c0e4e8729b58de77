#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Controllers over the filesystem and SQLite backends.

mod common;

use common::{by_group_then_rank, drain, grouped, named, observed_controller, tid};
use fetchdelta_core::cache::{CacheBackend, SnapshotStore};
use fetchdelta_core::diff::ChangeKind;
use fetchdelta_core::notify::Notification;
use fetchdelta_engine::MemorySource;
use fetchdelta_store::{BackendKind, FsCacheBackend, StoreConfig};
use std::sync::Arc;
use tempfile::TempDir;

fn store_for(kind: BackendKind, temp_dir: &TempDir) -> SnapshotStore {
    let mut config = StoreConfig::default();
    config.cache.backend = kind;
    config.cache.root = temp_dir.path().to_path_buf();
    config.open_store().unwrap()
}

fn restart_scenario(kind: BackendKind) {
    let temp_dir = TempDir::new().unwrap();
    let source = MemorySource::with_objects([grouped(1, "Home", 1), grouped(2, "Work", 2)]);

    // First process
    {
        let store = store_for(kind, &temp_dir);
        let (mut controller, _recorder) =
            observed_controller(&source, by_group_then_rank(), Some("group"), named(&store, "tasks"));
        assert!(controller.perform_fetch().unwrap().persisted);
    }

    // Work moves to Home while nothing is running
    source.upsert(grouped(2, "Home", 2));

    // Second process reopens the same cache
    let store = store_for(kind, &temp_dir);
    let (mut controller, recorder) =
        observed_controller(&source, by_group_then_rank(), Some("group"), named(&store, "tasks"));
    let outcome = controller.perform_fetch().unwrap();

    assert_eq!(outcome.script.section_changes.len(), 1, "backend {:?}", kind);
    assert_eq!(outcome.script.count(ChangeKind::Move), 1, "backend {:?}", kind);
    let notes = drain(&recorder);
    assert!(matches!(&notes[1], Notification::SectionChanged { section, .. } if section.name == "Work"));
    assert_eq!(controller.number_of_sections(), 1);
    assert_eq!(controller.number_of_rows(0), Some(2));
    assert_eq!(controller.index_path_of(&tid(2)).map(|p| p.row), Some(1));
}

#[test]
fn test_fs_cache_survives_restart() {
    restart_scenario(BackendKind::Fs);
}

#[test]
fn test_sqlite_cache_survives_restart() {
    restart_scenario(BackendKind::Sqlite);
}

#[test]
fn test_corrupt_cache_file_gives_full_insert_diff() {
    let temp_dir = TempDir::new().unwrap();
    let backend = FsCacheBackend::new(temp_dir.path());
    let store = SnapshotStore::new(Arc::new(backend.clone()));
    let source = MemorySource::with_objects([grouped(1, "Home", 1), grouped(2, "Home", 2)]);
    {
        let (mut controller, _recorder) =
            observed_controller(&source, by_group_then_rank(), Some("group"), named(&store, "tasks"));
        controller.perform_fetch().unwrap();
    }

    backend.write_cache("tasks", b"{\"cache_schema_version\": 1").unwrap();

    let (mut controller, _recorder) =
        observed_controller(&source, by_group_then_rank(), Some("group"), named(&store, "tasks"));
    let outcome = controller.perform_fetch().unwrap();

    assert_eq!(outcome.script.count(ChangeKind::Insert), 2);
    assert_eq!(outcome.script.row_changes.len(), 2);
    // The rebuilt baseline replaced the corrupt file
    assert!(store.load("tasks", Some("group")).is_some());
}
