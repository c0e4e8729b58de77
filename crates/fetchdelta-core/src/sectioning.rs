//! Section aggregation.
//!
//! Partitions an ordered fetch result into named sections in one forward
//! pass. A new section is opened whenever the extracted name differs from
//! the last-opened section, so the fetch's sort order must already group
//! same-section objects together. That grouping is a precondition placed on
//! the query layer and is not re-checked here: a query that interleaves
//! section names yields repeated section names and an undefined diff.

use crate::errors::FetchDeltaError;
use crate::model::{Entry, FetchedObject, Section, Snapshot};
use serde_json::Value;

/// Name of the only section when no section key path is configured.
pub const DEFAULT_SECTION_NAME: &str = "";

/// Render an attribute value as a section name.
///
/// Strings are used verbatim, `null` and missing attributes map to the
/// empty name, everything else uses its JSON text.
pub fn section_name_for(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Sectioning rule for one controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionAggregator {
    key_path: Option<String>,
}

impl SectionAggregator {
    /// `None` selects single-section mode.
    pub fn new(key_path: Option<String>) -> Self {
        Self { key_path }
    }

    pub fn single_section() -> Self {
        Self { key_path: None }
    }

    pub fn key_path(&self) -> Option<&str> {
        self.key_path.as_deref()
    }

    pub fn section_name(&self, object: &FetchedObject) -> String {
        match &self.key_path {
            Some(key) => section_name_for(object.attribute(key)),
            None => DEFAULT_SECTION_NAME.to_string(),
        }
    }

    /// Section the fetched objects, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the fetch yielded an identifier twice.
    pub fn aggregate(&self, objects: Vec<FetchedObject>) -> Result<Snapshot, FetchDeltaError> {
        let mut sections: Vec<Section> = Vec::new();

        for object in objects {
            let name = self.section_name(&object);
            match sections.last_mut() {
                Some(open) if open.name == name => open.entries.push(Entry::from(object)),
                _ => {
                    let mut section = Section::new(name);
                    section.entries.push(Entry::from(object));
                    sections.push(section);
                }
            }
        }

        if self.key_path.is_none() && sections.is_empty() {
            sections.push(Section::new(DEFAULT_SECTION_NAME));
        }

        Snapshot::new(sections)
    }

    /// The baseline to diff against when no usable cache exists.
    ///
    /// Single-section mode always has its one section, so a first fetch
    /// reports only row inserts.
    pub fn empty_snapshot(&self) -> Snapshot {
        match self.key_path {
            Some(_) => Snapshot::empty(),
            None => Snapshot::new(vec![Section::new(DEFAULT_SECTION_NAME)]).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Identifier, SafeObject};
    use serde_json::json;

    fn obj(key: i64, group: &str) -> SafeObject {
        SafeObject::new(Identifier::new("Task", key), Default::default()).with("group", group)
    }

    #[test]
    fn test_section_name_rendering() {
        assert_eq!(section_name_for(None), "");
        assert_eq!(section_name_for(Some(&Value::Null)), "");
        assert_eq!(section_name_for(Some(&json!("Work"))), "Work");
        assert_eq!(section_name_for(Some(&json!(3))), "3");
        assert_eq!(section_name_for(Some(&json!(true))), "true");
    }

    #[test]
    fn test_contiguous_names_share_a_section() {
        let agg = SectionAggregator::new(Some("group".to_string()));
        let snap = agg
            .aggregate(vec![obj(1, "A"), obj(2, "A"), obj(3, "B")])
            .unwrap();
        let names: Vec<&str> = snap.section_names().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(snap.sections()[0].number_of_objects(), 2);
    }

    #[test]
    fn test_single_section_mode_keeps_one_empty_section() {
        let agg = SectionAggregator::single_section();
        let snap = agg.aggregate(Vec::new()).unwrap();
        assert_eq!(snap.number_of_sections(), 1);
        assert_eq!(snap, agg.empty_snapshot());
    }

    #[test]
    fn test_keyed_mode_empty_fetch_has_no_sections() {
        let agg = SectionAggregator::new(Some("group".to_string()));
        assert_eq!(agg.aggregate(Vec::new()).unwrap().number_of_sections(), 0);
        assert_eq!(agg.empty_snapshot().number_of_sections(), 0);
    }
}
