//! Immutable sectioned snapshot of one fetch result.

use crate::errors::FetchDeltaError;
use crate::model::identifier::{Attributes, Identifier, SafeObject};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position of a row: section index, then row index within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl std::fmt::Display for IndexPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.section, self.row)
    }
}

/// One object as captured in a section. Its rank is its position in
/// [`Section::entries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub identifier: Identifier,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Entry {
    pub fn to_safe_object(&self) -> SafeObject {
        SafeObject::new(self.identifier.clone(), self.attributes.clone())
    }
}

impl From<SafeObject> for Entry {
    fn from(obj: SafeObject) -> Self {
        Self {
            identifier: obj.identifier,
            attributes: obj.attributes,
        }
    }
}

/// Named, ordered group of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn number_of_objects(&self) -> usize {
        self.entries.len()
    }

    pub fn info(&self) -> SectionInfo {
        SectionInfo {
            name: self.name.clone(),
            number_of_objects: self.entries.len(),
            identifiers: self.entries.iter().map(|e| e.identifier.clone()).collect(),
        }
    }
}

/// Value copy of a section handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub name: String,
    pub number_of_objects: usize,
    pub identifiers: Vec<Identifier>,
}

/// Ordered sequence of sections in first-seen order.
///
/// Identifiers are unique across all sections; [`Snapshot::new`] rejects a
/// section list that violates this. The identifier lookup table is derived
/// state and is rebuilt whenever a snapshot is constructed.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    sections: Vec<Section>,
    index: HashMap<Identifier, IndexPath>,
}

impl Snapshot {
    /// Build a snapshot from already-ordered sections.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if any identifier appears twice.
    pub fn new(sections: Vec<Section>) -> Result<Self, FetchDeltaError> {
        let mut index = HashMap::new();
        for (s, section) in sections.iter().enumerate() {
            for (r, entry) in section.entries.iter().enumerate() {
                if index
                    .insert(entry.identifier.clone(), IndexPath::new(s, r))
                    .is_some()
                {
                    return Err(FetchDeltaError::DuplicateIdentifier {
                        identifier: entry.identifier.to_string(),
                    });
                }
            }
        }
        Ok(Self { sections, index })
    }

    /// Snapshot with no sections at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    /// Total number of entries across all sections.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.index.contains_key(identifier)
    }

    pub(crate) fn lookup(&self, identifier: &Identifier) -> Option<IndexPath> {
        self.index.get(identifier).copied()
    }

    /// Every entry with its index path, in section then rank order.
    pub fn entries(&self) -> impl Iterator<Item = (IndexPath, &Entry)> + '_ {
        self.sections.iter().enumerate().flat_map(|(s, section)| {
            section
                .entries
                .iter()
                .enumerate()
                .map(move |(r, entry)| (IndexPath::new(s, r), entry))
        })
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.iter().map(|s| s.name.as_str())
    }
}

/// Structural equality: same sections, identifiers, ranks and attributes.
impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.sections == other.sections
    }
}
