#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Every durable backend must hand back exactly what was persisted.

mod common;

use common::grouped_snapshot;
use fetchdelta_core::cache::{CacheBackend, SnapshotStore};
use fetchdelta_store::{FsCacheBackend, SqliteCacheBackend};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn assert_round_trip(store: &SnapshotStore) {
    let snap = grouped_snapshot();
    store.persist("tasks", Some("group"), &snap).unwrap();

    let loaded = store.load("tasks", Some("group")).expect("cache present");
    assert_eq!(loaded, snap);
    assert_eq!(store.cache_names().unwrap(), vec!["tasks".to_string()]);
}

#[test]
fn test_fs_backend_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(Arc::new(FsCacheBackend::new(temp_dir.path())));
    assert_round_trip(&store);
    assert!(temp_dir.path().join("tasks.cache.json").exists());
}

#[test]
fn test_sqlite_backend_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let backend = SqliteCacheBackend::open(temp_dir.path().join("caches.sqlite3")).unwrap();
    assert_round_trip(&SnapshotStore::new(Arc::new(backend)));
}

#[test]
fn test_sqlite_cache_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("caches.sqlite3");
    let snap = grouped_snapshot();

    {
        let store = SnapshotStore::new(Arc::new(SqliteCacheBackend::open(&db_path).unwrap()));
        store.persist("tasks", Some("group"), &snap).unwrap();
    }

    let store = SnapshotStore::new(Arc::new(SqliteCacheBackend::open(&db_path).unwrap()));
    assert_eq!(store.load("tasks", Some("group")), Some(snap));
}

#[test]
fn test_fs_corrupt_file_loads_as_absent() {
    let temp_dir = TempDir::new().unwrap();
    let backend = FsCacheBackend::new(temp_dir.path());
    let store = SnapshotStore::new(Arc::new(backend.clone()));
    store.persist("tasks", Some("group"), &grouped_snapshot()).unwrap();

    // Truncate the envelope mid-document
    let path = backend.cache_path("tasks");
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(store.load("tasks", Some("group")).is_none());
}

#[test]
fn test_names_with_separators_stay_inside_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("root");
    let backend = FsCacheBackend::new(&root);

    backend.write_cache("../escape", b"x").unwrap();

    assert!(backend.cache_path("../escape").starts_with(&root));
    assert_eq!(backend.cache_names().unwrap(), vec!["../escape".to_string()]);
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[test]
fn test_listed_fs_names_are_readable() {
    let temp_dir = TempDir::new().unwrap();
    let backend = FsCacheBackend::new(temp_dir.path());
    backend.write_cache("ab", b"1").unwrap();
    fs::write(temp_dir.path().join("a%62.cache.json"), b"2").unwrap();

    let names = backend.cache_names().unwrap();
    assert_eq!(names, vec!["ab".to_string()]);
    for name in &names {
        assert!(backend.read_cache(name).unwrap().is_some());
    }
}

#[test]
fn test_delete_one_and_all_per_backend() {
    let temp_dir = TempDir::new().unwrap();
    let backends: Vec<Arc<dyn CacheBackend>> = vec![
        Arc::new(FsCacheBackend::new(temp_dir.path().join("fs"))),
        Arc::new(SqliteCacheBackend::open(temp_dir.path().join("db.sqlite3")).unwrap()),
    ];

    for backend in backends {
        let store = SnapshotStore::new(backend);
        let snap = grouped_snapshot();
        store.persist("a", Some("group"), &snap).unwrap();
        store.persist("b", Some("group"), &snap).unwrap();

        store.delete(Some("a")).unwrap();
        assert!(store.load("a", Some("group")).is_none());
        assert!(store.load("b", Some("group")).is_some());

        store.delete(None).unwrap();
        assert!(store.cache_names().unwrap().is_empty());
    }
}
