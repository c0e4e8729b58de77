//! Fetch sources.
//!
//! A [`FetchSource`] executes a [`FetchRequest`] against some object store
//! and returns the matching objects in sort order. [`MemorySource`] is the
//! in-process implementation used by the CLI and tests.

#![allow(clippy::result_large_err)]

use fetchdelta_core::errors::{ExError, ExErrorKind, Result};
use fetchdelta_core::model::{FetchRequest, FetchedObject, Identifier, SortDescriptor};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Executes fetch requests.
///
/// Implementations return each matching object once, already ordered by the
/// request's sort descriptors. Section grouping relies on that order.
pub trait FetchSource: Send + Sync {
    /// # Errors
    ///
    /// `QueryFailure` when the request cannot be executed.
    fn execute(&self, request: &FetchRequest) -> Result<Vec<FetchedObject>>;
}

#[derive(Debug, Default)]
struct MemoryState {
    objects: BTreeMap<String, Vec<FetchedObject>>,
    failure: Option<String>,
}

/// In-memory object store.
///
/// Cloning yields another handle onto the same objects, so a caller can keep
/// mutating the data a controller fetches from.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(objects: impl IntoIterator<Item = FetchedObject>) -> Self {
        let source = Self::new();
        for object in objects {
            source.upsert(object);
        }
        source
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert `object`, or replace the stored object with the same identifier
    /// in place.
    pub fn upsert(&self, object: FetchedObject) {
        let mut state = self.state();
        let bucket = state
            .objects
            .entry(object.identifier.entity.clone())
            .or_default();
        match bucket.iter_mut().find(|o| o.identifier == object.identifier) {
            Some(existing) => *existing = object,
            None => bucket.push(object),
        }
    }

    /// Returns whether an object was removed.
    pub fn remove(&self, identifier: &Identifier) -> bool {
        let mut state = self.state();
        let Some(bucket) = state.objects.get_mut(&identifier.entity) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|o| &o.identifier != identifier);
        before != bucket.len()
    }

    /// Make every following `execute` fail with `message`, or clear the
    /// failure with `None`.
    pub fn set_failure(&self, message: Option<String>) {
        self.state().failure = message;
    }

    /// Number of stored objects of `entity`.
    pub fn len(&self, entity: &str) -> usize {
        self.state().objects.get(entity).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.state().objects.values().all(Vec::is_empty)
    }
}

impl FetchSource for MemorySource {
    fn execute(&self, request: &FetchRequest) -> Result<Vec<FetchedObject>> {
        let state = self.state();
        if let Some(message) = &state.failure {
            return Err(query_failure(request, message.clone()));
        }

        let filter = match request.predicate.as_deref() {
            Some(text) => Some(EqualityPredicate::parse(text).map_err(|m| query_failure(request, m))?),
            None => None,
        };

        let mut matched: Vec<FetchedObject> = state
            .objects
            .get(&request.entity)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|o| filter.as_ref().map_or(true, |p| p.matches(o)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(state);

        // Stable, so ties keep insertion order
        matched.sort_by(|a, b| compare_by_descriptors(a, b, &request.sort));
        Ok(matched)
    }
}

fn query_failure(request: &FetchRequest, message: String) -> ExError {
    ExError::new(ExErrorKind::QueryFailure)
        .with_op("execute_fetch")
        .with_entity(request.entity.clone())
        .with_message(message)
}

/// `key == <json literal>`
#[derive(Debug, Clone, PartialEq)]
struct EqualityPredicate {
    key: String,
    value: Value,
}

impl EqualityPredicate {
    fn parse(text: &str) -> std::result::Result<Self, String> {
        let (key, literal) = text
            .split_once("==")
            .ok_or_else(|| format!("Unsupported predicate '{}': expected `key == value`", text))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Predicate '{}' has no attribute key", text));
        }
        let value = serde_json::from_str(literal.trim())
            .map_err(|e| format!("Predicate '{}' has an invalid JSON literal: {}", text, e))?;
        Ok(Self {
            key: key.to_string(),
            value,
        })
    }

    /// A missing attribute compares equal to `null`.
    fn matches(&self, object: &FetchedObject) -> bool {
        object.attribute(&self.key).unwrap_or(&Value::Null) == &self.value
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string, then arrays
/// and objects by their JSON text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a)
            .cmp(&type_rank(b))
            .then_with(|| a.to_string().cmp(&b.to_string())),
    }
}

/// Exact for integers of any magnitude; mixed or fractional pairs go through f64.
fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a.cmp(&b);
    }
    // a negative i64 against a u64 beyond i64::MAX
    if x.is_i64() && y.is_u64() {
        return Ordering::Less;
    }
    if x.is_u64() && y.is_i64() {
        return Ordering::Greater;
    }
    let (a, b) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn compare_by_descriptors(a: &FetchedObject, b: &FetchedObject, sort: &[SortDescriptor]) -> Ordering {
    for descriptor in sort {
        let left = a.attribute(&descriptor.key).unwrap_or(&Value::Null);
        let right = b.attribute(&descriptor.key).unwrap_or(&Value::Null);
        let ordering = compare_values(left, right);
        let ordering = if descriptor.ascending {
            ordering
        } else {
            ordering.reverse()
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
