//! `fetchdelta fetch`
//!
//! Loads a JSON array of rows as the object store, fetches it through a
//! controller bound to the chosen cache, prints each notification as one
//! JSON line in delivery order, then persists.

use crate::commands::CommandResult;
use clap::Args;
use fetchdelta_core::cache::SnapshotStore;
use fetchdelta_core::diff::render_human_summary;
use fetchdelta_core::errors::{ExError, ExErrorKind};
use fetchdelta_core::model::{Attributes, FetchRequest, FetchedObject, Identifier, PrimaryKey, SortDescriptor};
use fetchdelta_core::notify::RecordingObserver;
use fetchdelta_engine::{CacheBinding, FetchedResultsController, MemorySource};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// JSON file holding an array of row objects
    #[arg(long)]
    pub input: PathBuf,

    /// Entity name for every row
    #[arg(long)]
    pub entity: String,

    /// Row field holding the primary key (integer or string)
    #[arg(long, default_value = "id")]
    pub id_key: String,

    /// Sort descriptor `key`, `key:asc` or `key:desc`; repeatable
    #[arg(long = "sort")]
    pub sort: Vec<String>,

    /// Equality predicate, e.g. `done == false`
    #[arg(long = "where")]
    pub predicate: Option<String>,

    /// Attribute that names each row's section
    #[arg(long)]
    pub section_key: Option<String>,

    /// Cache to diff against and persist to; omit for a one-off fetch
    #[arg(long)]
    pub cache_name: Option<String>,

    /// Print a Markdown summary instead of JSON lines
    #[arg(long)]
    pub summary: bool,
}

pub fn execute(args: FetchArgs, store: SnapshotStore) -> CommandResult {
    let text = std::fs::read_to_string(&args.input)
        .map_err(|e| format!("Cannot read {}: {}", args.input.display(), e))?;
    let rows = parse_rows(&text, &args.entity, &args.id_key)?;

    let mut request = FetchRequest::new(args.entity.clone());
    for text in &args.sort {
        let descriptor = SortDescriptor::parse(text)
            .ok_or_else(|| format!("Invalid sort descriptor '{}'", text))?;
        request = request.sorted_by(descriptor);
    }
    if let Some(predicate) = args.predicate {
        request = request.with_predicate(predicate);
    }

    let cache = match args.cache_name {
        Some(name) => CacheBinding::named(store, name),
        None => CacheBinding::Ephemeral,
    };

    let mut controller = FetchedResultsController::new(
        Arc::new(MemorySource::with_objects(rows)),
        request,
        args.section_key,
        cache,
    );
    let recorder = Arc::new(Mutex::new(RecordingObserver::new()));
    controller.set_observer(Some(Box::new(recorder.clone())));

    let outcome = controller.perform_fetch()?;

    if args.summary {
        print!("{}", render_human_summary(&outcome.script));
    } else {
        let notifications = recorder
            .lock()
            .map_err(|_| "observer lock poisoned")?
            .take();
        for notification in &notifications {
            println!("{}", serde_json::to_string(notification)?);
        }
    }

    if controller.cache_name().is_some() && !outcome.persisted {
        eprintln!("Warning: new baseline was not persisted");
    }
    Ok(())
}

/// Rows from a JSON array of objects; `id_key` becomes the primary key and
/// every other field an attribute.
pub fn parse_rows(text: &str, entity: &str, id_key: &str) -> Result<Vec<FetchedObject>, ExError> {
    let invalid = |message: String| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("parse_rows")
            .with_entity(entity)
            .with_message(message)
    };

    let value: Value = serde_json::from_str(text).map_err(|e| invalid(format!("Invalid JSON: {}", e)))?;
    let Value::Array(items) = value else {
        return Err(invalid("Expected a JSON array of rows".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(fields) = item else {
                return Err(invalid(format!("Row {} is not an object", index)));
            };
            let mut attributes: Attributes = fields.into_iter().collect();
            let key = match attributes.remove(id_key) {
                Some(Value::Number(n)) => n
                    .as_i64()
                    .map(PrimaryKey::Int)
                    .ok_or_else(|| invalid(format!("Row {}: '{}' is not an integer", index, id_key)))?,
                Some(Value::String(s)) => PrimaryKey::Str(s),
                Some(_) => {
                    return Err(invalid(format!(
                        "Row {}: '{}' must be an integer or a string",
                        index, id_key
                    )))
                }
                None => return Err(invalid(format!("Row {} has no '{}' field", index, id_key))),
            };
            Ok(FetchedObject::new(Identifier::new(entity, key), attributes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rows_splits_key_from_attributes() {
        let rows = parse_rows(r#"[{"id": 1, "rank": 2}, {"id": "b", "rank": 1}]"#, "Task", "id").unwrap();

        assert_eq!(rows[0].identifier, Identifier::new("Task", 1));
        assert_eq!(rows[0].attribute("rank"), Some(&json!(2)));
        assert!(rows[0].attribute("id").is_none());
        assert_eq!(rows[1].identifier, Identifier::new("Task", "b"));
    }

    #[test]
    fn test_parse_rows_custom_id_key() {
        let rows = parse_rows(r#"[{"uuid": "x-1"}]"#, "Note", "uuid").unwrap();
        assert_eq!(rows[0].identifier, Identifier::new("Note", "x-1"));
    }

    #[test]
    fn test_parse_rows_rejects_bad_shapes() {
        for text in [
            "{}",
            "[1]",
            r#"[{"rank": 1}]"#,
            r#"[{"id": 1.5}]"#,
            r#"[{"id": [1]}]"#,
            "not json",
        ] {
            let err = parse_rows(text, "Task", "id").unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidInput, "input {:?}", text);
        }
    }
}
