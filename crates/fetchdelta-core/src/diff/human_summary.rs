//! Human-readable summary renderer for change scripts.

use crate::diff::model::{ChangeKind, ChangeRecord, ChangeScript, SectionChangeRecord};

/// Render a Markdown summary of a [`ChangeScript`]: a bold counts header, then
/// one list item per record in delivery order.
///
/// Informational only; consumers that apply changes must use the structured
/// script.
pub fn render_human_summary(script: &ChangeScript) -> String {
    let mut out = String::new();

    out.push_str("## Change Script\n\n");

    if script.is_empty() {
        out.push_str("_No changes._\n");
        return out;
    }

    out.push_str(&format!(
        "**Rows**: {} inserted, {} deleted, {} moved, {} updated  \n**Sections**: {} changed\n\n",
        script.count(ChangeKind::Insert),
        script.count(ChangeKind::Delete),
        script.count(ChangeKind::Move),
        script.count(ChangeKind::Update),
        script.section_changes.len(),
    ));

    if !script.section_changes.is_empty() {
        out.push_str("### Sections\n\n");
        for change in &script.section_changes {
            let (verb, index) = match change {
                SectionChangeRecord::Insert { section_index, .. } => ("insert", section_index),
                SectionChangeRecord::Delete { section_index, .. } => ("delete", section_index),
            };
            out.push_str(&format!(
                "- {} section {} `{}` ({} objects)\n",
                verb,
                index,
                change.section().name,
                change.section().number_of_objects
            ));
        }
        out.push('\n');
    }

    if !script.row_changes.is_empty() {
        out.push_str("### Rows\n\n");
        for change in &script.row_changes {
            let line = match change {
                ChangeRecord::Insert {
                    object,
                    new_index_path,
                } => format!("- insert `{}` at {}", object.identifier, new_index_path),
                ChangeRecord::Delete {
                    object,
                    old_index_path,
                } => format!("- delete `{}` at {}", object.identifier, old_index_path),
                ChangeRecord::Move {
                    object,
                    old_index_path,
                    new_index_path,
                } => format!(
                    "- move `{}` {} -> {}",
                    object.identifier, old_index_path, new_index_path
                ),
                ChangeRecord::Update { object, index_path } => {
                    format!("- update `{}` at {}", object.identifier, index_path)
                }
            };
            out.push_str(&line);
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Identifier, IndexPath, SafeObject};

    #[test]
    fn test_empty_script_summary() {
        let summary = render_human_summary(&ChangeScript::default());
        assert!(summary.contains("_No changes._"));
    }

    #[test]
    fn test_summary_lists_rows_in_order() {
        let object = SafeObject::new(Identifier::new("Task", 1), Default::default());
        let script = ChangeScript {
            section_changes: Vec::new(),
            row_changes: vec![
                ChangeRecord::Delete {
                    object: object.clone(),
                    old_index_path: IndexPath::new(0, 3),
                },
                ChangeRecord::Insert {
                    object,
                    new_index_path: IndexPath::new(0, 0),
                },
            ],
        };
        let summary = render_human_summary(&script);
        let delete_at = summary.find("- delete `Task:1` at (0, 3)").unwrap();
        let insert_at = summary.find("- insert `Task:1` at (0, 0)").unwrap();
        assert!(delete_at < insert_at);
        assert!(summary.contains("1 inserted, 1 deleted, 0 moved, 0 updated"));
        assert!(summary.starts_with("## Change Script\n"));
        assert!(summary.contains("**Rows**"));
        assert!(summary.contains("### Rows\n"));
    }
}
