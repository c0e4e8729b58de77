use fetchdelta_core::model::{Identifier, SafeObject, Snapshot};
use fetchdelta_core::sectioning::SectionAggregator;

/// Two sections, three rows, mixed attribute types.
#[allow(dead_code)]
pub fn grouped_snapshot() -> Snapshot {
    let objects = vec![
        SafeObject::new(Identifier::new("Task", 1), Default::default())
            .with("group", "Home")
            .with("rank", 1)
            .with("done", false),
        SafeObject::new(Identifier::new("Task", "b-2"), Default::default())
            .with("group", "Home")
            .with("rank", 2)
            .with("estimate", 0.25),
        SafeObject::new(Identifier::new("Task", 3), Default::default())
            .with("group", "Work")
            .with("rank", 3)
            .with("title", "Ship it"),
    ];
    SectionAggregator::new(Some("group".to_string()))
        .aggregate(objects)
        .expect("fixture has unique identifiers")
}
