//! Tag discovery and linking.
//!
//! Tags come from three signals: the Important pseudo-tag on
//! high-importance tasks, category strings, and `#word` tokens in task
//! titles. Discovery runs as a read-only pass over every task before any
//! entity is built, so tag ids are stable by the time tasks reference
//! them.

use crate::ids::{TODAY_TAG_ID, new_id};
use crate::model::{EntityTable, Tag, Theme};
use crate::source::{SourceTask, TodoExport};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Title of the pseudo-tag derived from high-importance tasks.
pub const IMPORTANT_TAG: &str = "Important";

/// Title of the synthetic Today tag.
pub const TODAY_TAG: &str = "Today";

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern is valid"));

/// Registry of discovered tags.
///
/// Names deduplicate case-insensitively; the casing a tag was first seen
/// under becomes its display title. The synthetic Today tag is held apart
/// from discovered tags and never participates in alphabetical ordering.
#[derive(Debug)]
pub struct TagRegistry {
    tags: Vec<Tag>,
    /// Lowercased title -> index into `tags`.
    index: HashMap<String, usize>,
    today: Tag,
    tag_color: String,
    now: i64,
}

impl TagRegistry {
    /// Build the registry by scanning every task in the export.
    pub fn discover(export: &TodoExport, tag_color: &str, now: i64) -> Self {
        let today = Tag {
            id: TODAY_TAG_ID.to_string(),
            title: TODAY_TAG.to_string(),
            task_ids: Vec::new(),
            created: now,
            modified: now,
            theme: Theme::with_color(tag_color),
            icon: Some("wb_sunny".to_string()),
        };
        let mut registry = Self {
            tags: Vec::new(),
            index: HashMap::new(),
            today,
            tag_color: tag_color.to_string(),
            now,
        };

        for list in &export.lists {
            for task in &list.tasks {
                for name in tag_names(task) {
                    registry.intern(&name);
                }
            }
        }

        registry
    }

    /// Resolve a tag name to its id, creating the tag on first sight.
    pub fn intern(&mut self, name: &str) -> String {
        let key = name.to_lowercase();
        if let Some(&i) = self.index.get(&key) {
            return self.tags[i].id.clone();
        }

        let tag = Tag {
            id: new_id(),
            title: name.to_string(),
            task_ids: Vec::new(),
            created: self.now,
            modified: self.now,
            theme: Theme::with_color(&self.tag_color),
            icon: None,
        };
        let id = tag.id.clone();
        self.index.insert(key, self.tags.len());
        self.tags.push(tag);
        id
    }

    /// Ordered, deduplicated tag ids for a task: the importance tag first,
    /// then categories in source order, then title hashtags in scan order.
    pub fn tags_for(&mut self, task: &SourceTask) -> Vec<String> {
        let mut ids = Vec::new();
        for name in tag_names(task) {
            let id = self.intern(&name);
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Append a task to a tag's back-references. The caller writes the
    /// task-side reference in the same step; a task is recorded at most
    /// once per tag.
    pub fn link(&mut self, tag_id: &str, task_id: &str) {
        if let Some(tag) = self.tags.iter_mut().find(|t| t.id == tag_id)
            && !tag.task_ids.iter().any(|t| t == task_id)
        {
            tag.task_ids.push(task_id.to_string());
        }
    }

    /// Finish discovery: the tag table sorted case-insensitively by title,
    /// with the synthetic tag appended last.
    pub fn into_table(self) -> EntityTable<Tag> {
        let Self { mut tags, today, .. } = self;
        tags.sort_by_key(|t| t.title.to_lowercase());

        let mut table = EntityTable::new();
        for tag in tags {
            table.insert(tag.id.clone(), tag);
        }
        table.insert(today.id.clone(), today);
        table
    }
}

/// Collect tag names signaled by a task, in task-side order. Blank
/// category strings are ignored.
pub fn tag_names(task: &SourceTask) -> Vec<String> {
    let mut names = Vec::new();
    if task.importance.as_deref() == Some("high") {
        names.push(IMPORTANT_TAG.to_string());
    }
    for category in &task.categories {
        let trimmed = category.trim();
        if !trimmed.is_empty() {
            names.push(trimmed.to_string());
        }
    }
    for captures in HASHTAG.captures_iter(&task.title) {
        if let Some(word) = captures.get(1) {
            names.push(word.as_str().to_string());
        }
    }
    names
}
