use fetchdelta_core::model::{Identifier, SafeObject, Snapshot};
use fetchdelta_core::sectioning::SectionAggregator;

/// A `Task` object with a `rank` sort attribute.
#[allow(dead_code)]
pub fn task(key: i64, rank: i64) -> SafeObject {
    SafeObject::new(Identifier::new("Task", key), Default::default()).with("rank", rank)
}

/// A `Task` object in a named group.
#[allow(dead_code)]
pub fn grouped(key: i64, group: &str, rank: i64) -> SafeObject {
    task(key, rank).with("group", group)
}

#[allow(dead_code)]
pub fn tid(key: i64) -> Identifier {
    Identifier::new("Task", key)
}

/// Section `objects` in single-section mode.
#[allow(dead_code)]
pub fn single(objects: Vec<SafeObject>) -> Snapshot {
    SectionAggregator::single_section()
        .aggregate(objects)
        .expect("fixture has unique identifiers")
}

/// Section `objects` by their `group` attribute.
#[allow(dead_code)]
pub fn by_group(objects: Vec<SafeObject>) -> Snapshot {
    SectionAggregator::new(Some("group".to_string()))
        .aggregate(objects)
        .expect("fixture has unique identifiers")
}
