use fetchdelta_core::cache::SnapshotStore;
use fetchdelta_core::model::{FetchRequest, Identifier, SafeObject, SortDescriptor};
use fetchdelta_core::notify::{Notification, RecordingObserver};
use fetchdelta_engine::{CacheBinding, FetchedResultsController, MemorySource};
use std::sync::{Arc, Mutex};

pub type SharedRecorder = Arc<Mutex<RecordingObserver>>;

#[allow(dead_code)]
pub fn task(key: i64, rank: i64) -> SafeObject {
    SafeObject::new(Identifier::new("Task", key), Default::default()).with("rank", rank)
}

#[allow(dead_code)]
pub fn grouped(key: i64, group: &str, rank: i64) -> SafeObject {
    task(key, rank).with("group", group)
}

#[allow(dead_code)]
pub fn tid(key: i64) -> Identifier {
    Identifier::new("Task", key)
}

/// `Task` sorted by `rank`
#[allow(dead_code)]
pub fn by_rank() -> FetchRequest {
    FetchRequest::new("Task").sorted_by(SortDescriptor::ascending("rank"))
}

/// `Task` sorted by `group` then `rank`
#[allow(dead_code)]
pub fn by_group_then_rank() -> FetchRequest {
    FetchRequest::new("Task")
        .sorted_by(SortDescriptor::ascending("group"))
        .sorted_by(SortDescriptor::ascending("rank"))
}

/// Controller with a recorder attached; the recorder handle is returned for
/// inspection.
#[allow(dead_code)]
pub fn observed_controller(
    source: &MemorySource,
    request: FetchRequest,
    section_key_path: Option<&str>,
    cache: CacheBinding,
) -> (FetchedResultsController, SharedRecorder) {
    let mut controller = FetchedResultsController::new(
        Arc::new(source.clone()),
        request,
        section_key_path.map(str::to_string),
        cache,
    );
    let recorder: SharedRecorder = Arc::new(Mutex::new(RecordingObserver::new()));
    controller.set_observer(Some(Box::new(recorder.clone())));
    (controller, recorder)
}

#[allow(dead_code)]
pub fn named(store: &SnapshotStore, name: &str) -> CacheBinding {
    CacheBinding::named(store.clone(), name)
}

#[allow(dead_code)]
pub fn drain(recorder: &SharedRecorder) -> Vec<Notification> {
    recorder.lock().expect("recorder lock").take()
}
