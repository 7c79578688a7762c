//! Source-side data model: To Do task list exports.
//!
//! Exports come in two layouts -- an array of lists with their tasks
//! embedded, or lists and tasks split into separate collections keyed by
//! list id -- plus the `{ "value": [...] }` envelope raw Graph API dumps
//! use. Everything normalizes into [`TodoExport`] before conversion
//! starts. Malformed individual records are skipped with a warning; only
//! an unrecognizable top-level shape is fatal.

use crate::error::{ConvertError, ConvertResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A datetime value in a source export.
///
/// Graph wraps instants in `{ "dateTime": ..., "timeZone": ... }` objects;
/// hand-rolled exports often carry plain strings. Both are accepted. Named
/// time zones are not resolved; naive datetimes count as UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateTimeField {
    Zoned {
        #[serde(rename = "dateTime")]
        date_time: String,
        #[serde(rename = "timeZone", default)]
        time_zone: Option<String>,
    },
    Plain(String),
}

impl DateTimeField {
    /// The raw datetime string, ignoring any zone annotation.
    pub fn raw(&self) -> &str {
        match self {
            DateTimeField::Zoned { date_time, .. } => date_time,
            DateTimeField::Plain(s) => s,
        }
    }
}

/// Recurrence pattern of a repeating task, Graph dialect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecurrencePattern {
    /// Pattern kind: daily, weekly, absoluteMonthly, relativeMonthly,
    /// absoluteYearly, relativeYearly, or hourly.
    #[serde(rename = "type")]
    pub pattern_type: String,
    pub interval: i64,
    pub days_of_week: Option<Vec<String>>,
    pub day_of_month: Option<u32>,
}

/// Recurrence wrapper as Graph nests it (`recurrence.pattern`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recurrence {
    pub pattern: Option<RecurrencePattern>,
    // Graph's `range` (end conditions) has no destination field and is
    // ignored.
}

/// Task body (notes).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskBody {
    pub content: String,
    pub content_type: Option<String>,
}

/// A checklist item nested under a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistItem {
    pub display_name: String,
    pub is_checked: bool,
    pub created_date_time: Option<DateTimeField>,
}

/// A task from the source export. Every field is optional in the wild.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceTask {
    pub title: String,
    pub status: Option<String>,
    pub importance: Option<String>,
    pub created_date_time: Option<DateTimeField>,
    pub last_modified_date_time: Option<DateTimeField>,
    pub completed_date_time: Option<DateTimeField>,
    pub due_date_time: Option<DateTimeField>,
    pub is_reminder_on: bool,
    pub reminder_date_time: Option<DateTimeField>,
    pub categories: Vec<String>,
    pub recurrence: Option<Recurrence>,
    pub body: Option<TaskBody>,
    pub checklist_items: Vec<ChecklistItem>,
}

/// A task list from the source export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceList {
    pub id: Option<String>,
    pub display_name: String,
    pub tasks: Vec<SourceTask>,
}

/// List shell used while parsing, so one malformed task cannot take its
/// whole list down with it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawList {
    id: Option<String>,
    display_name: String,
    tasks: Vec<Value>,
}

/// A normalized source export: lists with their tasks embedded.
#[derive(Debug, Clone, Default)]
pub struct TodoExport {
    pub lists: Vec<SourceList>,
}

impl TodoExport {
    /// Normalize a parsed JSON document into the canonical list-of-lists
    /// shape. Accepts three layouts:
    ///
    /// - an array of list objects with embedded `tasks`,
    /// - `{ "lists": [...], "tasks": { "<listId>": [...] } }` with tasks
    ///   grouped separately by list id,
    /// - `{ "value": [...] }`, the envelope raw Graph API dumps use.
    ///
    /// Anything else is rejected before any conversion work starts.
    pub fn from_value(value: Value) -> ConvertResult<Self> {
        match value {
            Value::Array(items) => Ok(Self::from_list_array(items)),
            Value::Object(mut map) => {
                if let Some(lists) = map.remove("lists") {
                    let Value::Array(lists) = lists else {
                        return Err(ConvertError::UnrecognizedExport(
                            "expected \"lists\" to be an array".to_string(),
                        ));
                    };
                    Self::from_split_shape(lists, map.remove("tasks"))
                } else if let Some(value) = map.remove("value") {
                    let Value::Array(items) = value else {
                        return Err(ConvertError::UnrecognizedExport(
                            "expected \"value\" to be an array".to_string(),
                        ));
                    };
                    Ok(Self::from_list_array(items))
                } else {
                    Err(ConvertError::UnrecognizedExport(
                        "object has neither \"lists\" nor \"value\"".to_string(),
                    ))
                }
            }
            other => Err(ConvertError::UnrecognizedExport(format!(
                "expected an array or object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Parse an export from JSON text.
    pub fn from_json(json: &str) -> ConvertResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load an export from a file (supports both plain JSON and gzip).
    pub fn from_file(path: &std::path::Path) -> ConvertResult<Self> {
        use std::fs::File;
        use std::io::{BufReader, Read};

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        // Check for gzip magic bytes
        let mut magic = [0u8; 2];
        reader.read_exact(&mut magic)?;

        // Reset to start
        drop(reader);
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let value: Value = if magic == [0x1f, 0x8b] {
            let decoder = flate2::read::GzDecoder::new(reader);
            serde_json::from_reader(decoder)?
        } else {
            serde_json::from_reader(reader)?
        };

        Self::from_value(value)
    }

    /// Total number of tasks across all lists.
    pub fn task_count(&self) -> usize {
        self.lists.iter().map(|l| l.tasks.len()).sum()
    }

    fn from_list_array(items: Vec<Value>) -> Self {
        let mut lists = Vec::with_capacity(items.len());
        for item in items {
            if let Some(list) = parse_list(item) {
                lists.push(list);
            }
        }
        Self { lists }
    }

    fn from_split_shape(lists: Vec<Value>, tasks: Option<Value>) -> ConvertResult<Self> {
        let mut out = Vec::with_capacity(lists.len());
        for item in lists {
            if let Some(list) = parse_list(item) {
                out.push(list);
            }
        }

        match tasks {
            None => {}
            Some(Value::Object(groups)) => {
                // Attach each task group to the list it is keyed under.
                for (list_id, group) in groups {
                    let Value::Array(items) = group else {
                        warn!(list_id = %list_id, "Skipping task group that is not an array");
                        continue;
                    };
                    let parsed: Vec<SourceTask> =
                        items.into_iter().filter_map(parse_task).collect();
                    match out
                        .iter_mut()
                        .find(|l| l.id.as_deref() == Some(list_id.as_str()))
                    {
                        Some(list) => list.tasks.extend(parsed),
                        None => {
                            warn!(list_id = %list_id, "Dropping task group for unknown list id");
                        }
                    }
                }
            }
            Some(_) => {
                return Err(ConvertError::UnrecognizedExport(
                    "expected \"tasks\" to be an object keyed by list id".to_string(),
                ));
            }
        }

        Ok(Self { lists: out })
    }
}

fn parse_list(item: Value) -> Option<SourceList> {
    let raw: RawList = match serde_json::from_value(item) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Skipping malformed list record");
            return None;
        }
    };
    let tasks = raw.tasks.into_iter().filter_map(parse_task).collect();
    Some(SourceList {
        id: raw.id,
        display_name: raw.display_name,
        tasks,
    })
}

fn parse_task(item: Value) -> Option<SourceTask> {
    match serde_json::from_value(item) {
        Ok(task) => Some(task),
        Err(e) => {
            warn!(error = %e, "Skipping malformed task record");
            None
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_embedded_shape() {
        let export = TodoExport::from_value(json!([
            {
                "displayName": "Groceries",
                "tasks": [
                    { "title": "Milk" },
                    { "title": "Eggs", "status": "completed" }
                ]
            }
        ]))
        .unwrap();

        assert_eq!(export.lists.len(), 1);
        assert_eq!(export.lists[0].display_name, "Groceries");
        assert_eq!(export.task_count(), 2);
    }

    #[test]
    fn parses_split_shape() {
        let export = TodoExport::from_value(json!({
            "lists": [
                { "id": "a", "displayName": "Home" },
                { "id": "b", "displayName": "Work" }
            ],
            "tasks": {
                "a": [{ "title": "Vacuum" }],
                "b": [{ "title": "Report" }, { "title": "Slides" }]
            }
        }))
        .unwrap();

        assert_eq!(export.lists[0].tasks.len(), 1);
        assert_eq!(export.lists[1].tasks.len(), 2);
    }

    #[test]
    fn drops_orphan_task_groups() {
        let export = TodoExport::from_value(json!({
            "lists": [{ "id": "a", "displayName": "Home" }],
            "tasks": {
                "missing": [{ "title": "Lost" }]
            }
        }))
        .unwrap();

        assert_eq!(export.task_count(), 0);
    }

    #[test]
    fn unwraps_value_envelope() {
        let export = TodoExport::from_value(json!({
            "value": [
                { "displayName": "Flagged", "tasks": [{ "title": "Call back" }] }
            ]
        }))
        .unwrap();

        assert_eq!(export.lists.len(), 1);
        assert_eq!(export.task_count(), 1);
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert!(matches!(
            TodoExport::from_value(json!(42)),
            Err(ConvertError::UnrecognizedExport(_))
        ));
        assert!(matches!(
            TodoExport::from_value(json!({ "foo": [] })),
            Err(ConvertError::UnrecognizedExport(_))
        ));
        assert!(matches!(
            TodoExport::from_value(json!({ "lists": "nope" })),
            Err(ConvertError::UnrecognizedExport(_))
        ));
        assert!(matches!(
            TodoExport::from_value(json!({ "lists": [], "tasks": [1, 2] })),
            Err(ConvertError::UnrecognizedExport(_))
        ));
    }

    #[test]
    fn skips_malformed_records() {
        let export = TodoExport::from_value(json!([
            {
                "displayName": "Mixed",
                "tasks": [
                    { "title": "Good" },
                    { "title": 123 },
                    { "title": "Also good" }
                ]
            },
            "not a list"
        ]))
        .unwrap();

        assert_eq!(export.lists.len(), 1);
        assert_eq!(export.lists[0].tasks.len(), 2);
    }

    #[test]
    fn datetime_field_accepts_both_forms() {
        let task: SourceTask = serde_json::from_value(json!({
            "title": "Due soon",
            "dueDateTime": { "dateTime": "2024-03-01T00:00:00.0000000", "timeZone": "UTC" },
            "reminderDateTime": "2024-03-01T09:00:00Z"
        }))
        .unwrap();

        assert_eq!(
            task.due_date_time.unwrap().raw(),
            "2024-03-01T00:00:00.0000000"
        );
        assert_eq!(task.reminder_date_time.unwrap().raw(), "2024-03-01T09:00:00Z");
    }

    #[test]
    fn recurrence_pattern_fields_deserialize() {
        let task: SourceTask = serde_json::from_value(json!({
            "title": "Standup",
            "recurrence": {
                "pattern": {
                    "type": "weekly",
                    "interval": 1,
                    "daysOfWeek": ["monday", "wednesday"]
                }
            }
        }))
        .unwrap();

        let pattern = task.recurrence.unwrap().pattern.unwrap();
        assert_eq!(pattern.pattern_type, "weekly");
        assert_eq!(pattern.days_of_week.as_deref(), Some(&["monday".to_string(), "wednesday".to_string()][..]));
    }
}
