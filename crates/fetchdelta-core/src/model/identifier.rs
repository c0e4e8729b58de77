use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observed attribute values of an object at fetch time.
///
/// A `BTreeMap` keeps serialization order stable so the cache digest is
/// deterministic.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Primary key value of an object within its entity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimaryKey::Int(v) => write!(f, "{}", v),
            PrimaryKey::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(v: i64) -> Self {
        PrimaryKey::Int(v)
    }
}

impl From<i32> for PrimaryKey {
    fn from(v: i32) -> Self {
        PrimaryKey::Int(i64::from(v))
    }
}

impl From<&str> for PrimaryKey {
    fn from(v: &str) -> Self {
        PrimaryKey::Str(v.to_string())
    }
}

impl From<String> for PrimaryKey {
    fn from(v: String) -> Self {
        PrimaryKey::Str(v)
    }
}

/// Stable identity of an object across fetches.
///
/// Two identifiers are equal iff they name the same entity type and the same
/// primary key value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    pub entity: String,
    pub key: PrimaryKey,
}

impl Identifier {
    pub fn new(entity: impl Into<String>, key: impl Into<PrimaryKey>) -> Self {
        Self {
            entity: entity.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.entity, self.key)
    }
}

/// Self-contained value copy of a fetched object.
///
/// Holds no reference into the object store, so it can be handed to an
/// observer running on any thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeObject {
    pub identifier: Identifier,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Objects returned by a fetch source are already value records.
pub type FetchedObject = SafeObject;

impl SafeObject {
    pub fn new(identifier: Identifier, attributes: Attributes) -> Self {
        Self {
            identifier,
            attributes,
        }
    }

    /// Builder-style attribute setter, mostly for tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute; absent keys read as `None`.
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }
}
