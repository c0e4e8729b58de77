//! Framing of change notifications.

mod common;

use common::{by_group, grouped, single, task, tid};
use fetchdelta_core::diff::{compute_changes, ChangeKind, OrderingKeys, SectionChangeKind};
use fetchdelta_core::model::IndexPath;
use fetchdelta_core::notify::{deliver, Notification, RecordingObserver};

#[test]
fn test_single_insert_is_framed() {
    // Given: a one-row change
    let script = compute_changes(
        &single(vec![]),
        &single(vec![task(1, 1)]),
        &OrderingKeys::new(["rank"]),
    );

    // When: delivered
    let mut observer = RecordingObserver::new();
    let calls = deliver(&script, &mut observer);

    // Then: will, object, did
    assert_eq!(calls, 3);
    let notes = observer.take();
    assert_eq!(notes.first(), Some(&Notification::WillChange));
    assert_eq!(notes.last(), Some(&Notification::DidChange));
    match &notes[1] {
        Notification::ObjectChanged {
            object,
            index_path,
            kind,
            new_index_path,
        } => {
            assert_eq!(object.identifier, tid(1));
            assert_eq!(*index_path, None);
            assert_eq!(*kind, ChangeKind::Insert);
            assert_eq!(*new_index_path, Some(IndexPath::new(0, 0)));
        }
        other => panic!("unexpected notification {:?}", other),
    }
}

#[test]
fn test_section_records_precede_row_records() {
    let script = compute_changes(
        &by_group(vec![]),
        &by_group(vec![grouped(1, "A", 1), grouped(2, "B", 2)]),
        &OrderingKeys::new(["rank", "group"]),
    );

    let mut observer = RecordingObserver::new();
    deliver(&script, &mut observer);
    let notes = observer.take();

    let hooks: Vec<&str> = notes
        .iter()
        .map(|n| match n {
            Notification::WillChange => "will",
            Notification::SectionChanged { .. } => "section",
            Notification::ObjectChanged { .. } => "object",
            Notification::DidChange => "did",
        })
        .collect();
    assert_eq!(hooks, vec!["will", "section", "section", "object", "object", "did"]);

    assert!(matches!(
        &notes[1],
        Notification::SectionChanged { section_index: 0, kind: SectionChangeKind::Insert, .. }
    ));
}

#[test]
fn test_move_carries_both_paths() {
    let script = compute_changes(
        &single(vec![task(1, 1), task(2, 2)]),
        &single(vec![task(2, 2), task(1, 3)]),
        &OrderingKeys::new(["rank"]),
    );

    let mut observer = RecordingObserver::new();
    deliver(&script, &mut observer);

    let moved = observer
        .notifications
        .iter()
        .find_map(|n| match n {
            Notification::ObjectChanged {
                kind: ChangeKind::Move,
                index_path,
                new_index_path,
                ..
            } => Some((*index_path, *new_index_path)),
            _ => None,
        })
        .expect("a move notification");
    assert_eq!(moved, (Some(IndexPath::new(0, 0)), Some(IndexPath::new(0, 1))));
}

#[test]
fn test_update_and_delete_have_no_new_path() {
    let script = compute_changes(
        &single(vec![task(1, 1), task(2, 2)]),
        &single(vec![task(1, 1).with("title", "t")]),
        &OrderingKeys::new(["rank"]),
    );

    let mut observer = RecordingObserver::new();
    deliver(&script, &mut observer);

    for note in &observer.notifications {
        if let Notification::ObjectChanged {
            kind,
            index_path,
            new_index_path,
            ..
        } = note
        {
            assert!(matches!(kind, ChangeKind::Update | ChangeKind::Delete));
            assert!(index_path.is_some());
            assert!(new_index_path.is_none());
        }
    }
}

#[test]
fn test_unchanged_refetch_fires_nothing() {
    let snap = single(vec![task(1, 1)]);
    let script = compute_changes(&snap, &snap.clone(), &OrderingKeys::new(["rank"]));

    let mut observer = RecordingObserver::new();
    assert_eq!(deliver(&script, &mut observer), 0);
    assert!(observer.notifications.is_empty());
}
