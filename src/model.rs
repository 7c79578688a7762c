//! Destination-side data model: the flat entity tables of a backup.
//!
//! The destination stores everything relationally: ordered id lists plus
//! id-keyed entity maps, with relationships expressed as id references on
//! both sides. Field names serialize in camelCase to match the backup
//! format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An identifier-keyed entity collection: an ordered id list plus an
/// id-to-entity map. Iteration order of `ids` is the collection's order;
/// the map exists for lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTable<T> {
    pub ids: Vec<String>,
    pub entities: BTreeMap<String, T>,
}

impl<T> EntityTable<T> {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            entities: BTreeMap::new(),
        }
    }

    /// Insert an entity, appending its id to the ordered id list.
    pub fn insert(&mut self, id: String, entity: T) {
        self.ids.push(id.clone());
        self.entities.insert(id, entity);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.entities.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<T> Default for EntityTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Visual theme block attached to projects and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary: String,
    pub is_auto_contrast: bool,
}

impl Theme {
    pub fn with_color(color: &str) -> Self {
        Self {
            primary: color.to_string(),
            is_auto_contrast: true,
        }
    }
}

/// A destination project, one per source task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Top-level tasks of this project, in source order.
    pub task_ids: Vec<String>,
    pub backlog_task_ids: Vec<String>,
    pub is_archived: bool,
    pub is_enable_backlog: bool,
    pub theme: Theme,
}

/// A destination task. Subtasks are tasks with `parent_id` set; they live
/// in the same table as their parents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub is_done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_on: Option<i64>,
    pub created: i64,
    pub modified: i64,
    /// Calendar due day (`YYYY-MM-DD`); mutually exclusive with
    /// `due_with_time`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_day: Option<String>,
    /// Timed due instant in epoch ms; mutually exclusive with `due_day`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_with_time: Option<i64>,
    pub has_planned_time: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_at: Option<i64>,
    pub tag_ids: Vec<String>,
    pub sub_task_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_cfg_id: Option<String>,
}

/// A destination tag with its task back-references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub title: String,
    /// Tasks carrying this tag; kept in step with `Task::tag_ids`.
    pub task_ids: Vec<String>,
    pub created: i64,
    pub modified: i64,
    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Recurrence cycle in the destination vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatCycle {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Preset shorthand the destination shows for common recurrence shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuickSetting {
    Daily,
    WeeklyCurrentWeekday,
    MondayToFriday,
    MonthlyCurrentDate,
    YearlyCurrentDate,
    Custom,
}

/// A repeat configuration owned by a single incomplete task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatCfg {
    pub id: String,
    pub project_id: String,
    /// Title snapshot from the owning task at conversion time.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub tag_ids: Vec<String>,
    /// Creation-order sort key, unique per run.
    pub order: i32,
    pub repeat_cycle: RepeatCycle,
    pub repeat_every: u32,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    /// Anchor day (`YYYY-MM-DD`); set only for monthly and yearly cycles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    pub quick_setting: QuickSetting,
    pub is_paused: bool,
}

/// What a reminder points at. Only task reminders are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReminderKind {
    Task,
}

/// A reminder scheduled for a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub remind_at: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub related_id: String,
}

/// A node in a 2-level navigation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MenuNode {
    /// A grouping folder with child nodes.
    #[serde(rename_all = "camelCase")]
    Folder {
        id: String,
        title: String,
        children: Vec<MenuNode>,
    },
    /// A leaf pointing at an entity by id.
    Item { id: String },
}

/// Minimal global settings block the destination expects in every backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    pub misc: MiscConfig,
    pub lang: LangConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiscConfig {
    /// 1 = Monday, matching the destination's week layout.
    pub first_day_of_week: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LangConfig {
    pub lng: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            misc: MiscConfig {
                first_day_of_week: 1,
            },
            lang: LangConfig {
                lng: "en".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_table_preserves_insertion_order() {
        let mut table = EntityTable::new();
        table.insert("b".to_string(), 2);
        table.insert("a".to_string(), 1);
        table.insert("c".to_string(), 3);

        assert_eq!(table.ids, vec!["b", "a", "c"]);
        assert_eq!(table.get("a"), Some(&1));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn menu_node_serializes_with_type_tag() {
        let node = MenuNode::Folder {
            id: "f1".to_string(),
            title: "Stuff".to_string(),
            children: vec![MenuNode::Item {
                id: "i1".to_string(),
            }],
        };

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "folder");
        assert_eq!(value["children"][0]["type"], "item");
        assert_eq!(value["children"][0]["id"], "i1");
    }

    #[test]
    fn quick_setting_uses_destination_names() {
        let value = serde_json::to_value(QuickSetting::WeeklyCurrentWeekday).unwrap();
        assert_eq!(value, "WEEKLY_CURRENT_WEEKDAY");
        let value = serde_json::to_value(QuickSetting::MondayToFriday).unwrap();
        assert_eq!(value, "MONDAY_TO_FRIDAY");
    }

    #[test]
    fn optional_task_fields_are_omitted() {
        let task = Task {
            id: "t".to_string(),
            project_id: "p".to_string(),
            title: "Bare".to_string(),
            is_done: false,
            done_on: None,
            created: 0,
            modified: 0,
            due_day: None,
            due_with_time: None,
            has_planned_time: false,
            reminder_id: None,
            remind_at: None,
            tag_ids: Vec::new(),
            sub_task_ids: Vec::new(),
            parent_id: None,
            notes: None,
            repeat_cfg_id: None,
        };

        let value = serde_json::to_value(&task).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("dueDay"));
        assert!(!obj.contains_key("parentId"));
        assert!(obj.contains_key("projectId"));
        assert!(obj.contains_key("hasPlannedTime"));
    }
}
