//! Entity construction for the build pass.
//!
//! Processes lists and tasks in source order, wiring every relationship
//! on both sides in the same step it creates the entities involved. There
//! is no fix-up pass afterwards.

use super::recurrence;
use super::tags::TagRegistry;
use crate::config::ConvertConfig;
use crate::ids::new_id;
use crate::model::{
    EntityTable, Project, Reminder, ReminderKind, RepeatCfg, Task, Theme,
};
use crate::report::ConversionSummary;
use crate::source::{SourceList, SourceTask};
use crate::time::{day_string, parse_ms_or, parse_utc, seconds_into_day};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Output tables of the build pass.
#[derive(Debug)]
pub struct BuiltEntities {
    pub projects: EntityTable<Project>,
    pub tasks: EntityTable<Task>,
    pub repeat_cfgs: EntityTable<RepeatCfg>,
    pub reminders: Vec<Reminder>,
}

/// Builds destination entities from source lists, one task at a time.
pub struct EntityBuilder<'a> {
    registry: &'a mut TagRegistry,
    config: &'a ConvertConfig,
    /// Shared run clock; every absent or unparseable source timestamp
    /// falls back to this one instant.
    now: DateTime<Utc>,
    now_ms: i64,
    projects: EntityTable<Project>,
    tasks: EntityTable<Task>,
    repeat_cfgs: EntityTable<RepeatCfg>,
    reminders: Vec<Reminder>,
    next_repeat_order: i32,
}

impl<'a> EntityBuilder<'a> {
    pub fn new(registry: &'a mut TagRegistry, config: &'a ConvertConfig, now: DateTime<Utc>) -> Self {
        Self {
            registry,
            config,
            now,
            now_ms: now.timestamp_millis(),
            projects: EntityTable::new(),
            tasks: EntityTable::new(),
            repeat_cfgs: EntityTable::new(),
            reminders: Vec::new(),
            next_repeat_order: 0,
        }
    }

    /// Convert one source list into a project and its tasks.
    pub fn build_list(&mut self, list: &SourceList, summary: &mut ConversionSummary) {
        let name = list.display_name.trim();
        let title = if name.is_empty() {
            self.config.fallback_list_title.clone()
        } else {
            name.to_string()
        };

        let project = Project {
            id: new_id(),
            title,
            task_ids: Vec::new(),
            backlog_task_ids: Vec::new(),
            is_archived: false,
            is_enable_backlog: false,
            theme: Theme::with_color(&self.config.theme.project_color),
        };
        let project_id = project.id.clone();
        self.projects.insert(project_id.clone(), project);
        summary.projects += 1;

        for task in &list.tasks {
            self.build_task(task, &project_id, summary);
        }
    }

    /// Tear down into the built tables.
    pub fn finish(self) -> BuiltEntities {
        BuiltEntities {
            projects: self.projects,
            tasks: self.tasks,
            repeat_cfgs: self.repeat_cfgs,
            reminders: self.reminders,
        }
    }

    fn build_task(&mut self, source: &SourceTask, project_id: &str, summary: &mut ConversionSummary) {
        let title = source.title.trim();
        if title.is_empty() {
            debug!("Skipping task with blank title");
            summary.skipped_tasks += 1;
            return;
        }

        let task_id = new_id();

        let created_dt = source
            .created_date_time
            .as_ref()
            .and_then(|f| parse_utc(f.raw()))
            .unwrap_or(self.now);
        let created = created_dt.timestamp_millis();
        let modified = parse_ms_or(
            source.last_modified_date_time.as_ref().map(|f| f.raw()),
            self.now_ms,
        );

        let is_done = source.status.as_deref() == Some("completed");
        let done_on = is_done.then(|| {
            parse_ms_or(
                source.completed_date_time.as_ref().map(|f| f.raw()),
                modified,
            )
        });

        // A due instant at (or within a minute of) midnight is a day-level
        // due date; anything later in the day is a timed one. Never both.
        let due = source
            .due_date_time
            .as_ref()
            .and_then(|f| parse_utc(f.raw()));
        let (due_day, due_with_time) = match due {
            Some(dt) if seconds_into_day(&dt) < 60 => (Some(day_string(&dt)), None),
            Some(dt) => (None, Some(dt.timestamp_millis())),
            None => (None, None),
        };
        let has_planned_time = due_day.is_some() || due_with_time.is_some();

        // Reminder entity and task-side reference are created together or
        // not at all.
        let mut reminder_id = None;
        let mut remind_at = None;
        if source.is_reminder_on
            && let Some(at) = source
                .reminder_date_time
                .as_ref()
                .and_then(|f| parse_utc(f.raw()))
        {
            let reminder = Reminder {
                id: new_id(),
                remind_at: at.timestamp_millis(),
                title: title.to_string(),
                kind: ReminderKind::Task,
                related_id: task_id.clone(),
            };
            remind_at = Some(reminder.remind_at);
            reminder_id = Some(reminder.id.clone());
            self.reminders.push(reminder);
            summary.reminders += 1;
        }

        // Notes copy verbatim; a body that trims to nothing is no body.
        let notes = source
            .body
            .as_ref()
            .map(|b| b.content.as_str())
            .filter(|content| !content.trim().is_empty())
            .map(str::to_string);

        let tag_ids = self.registry.tags_for(source);
        for tag_id in &tag_ids {
            self.registry.link(tag_id, &task_id);
        }

        let mut sub_task_ids = Vec::new();
        let mut sub_tasks = Vec::new();
        for item in &source.checklist_items {
            let label = item.display_name.trim();
            if label.is_empty() {
                debug!("Skipping checklist item with blank label");
                continue;
            }
            let sub_created = parse_ms_or(
                item.created_date_time.as_ref().map(|f| f.raw()),
                self.now_ms,
            );
            let sub = Task {
                id: new_id(),
                project_id: project_id.to_string(),
                title: label.to_string(),
                is_done: item.is_checked,
                done_on: None,
                created: sub_created,
                modified: sub_created,
                due_day: None,
                due_with_time: None,
                has_planned_time: false,
                reminder_id: None,
                remind_at: None,
                tag_ids: Vec::new(),
                sub_task_ids: Vec::new(),
                parent_id: Some(task_id.clone()),
                notes: None,
                repeat_cfg_id: None,
            };
            sub_task_ids.push(sub.id.clone());
            sub_tasks.push(sub);
            summary.sub_tasks += 1;
        }

        // Completed tasks never spawn repeat configs; their recurrence
        // data is discarded.
        let mut repeat_cfg_id = None;
        if !is_done
            && let Some(pattern) = source.recurrence.as_ref().and_then(|r| r.pattern.as_ref())
            && let Some(t) = recurrence::translate(
                pattern,
                source.due_date_time.as_ref().map(|f| f.raw()),
                created_dt,
                title,
                summary,
            )
        {
            let cfg = RepeatCfg {
                id: new_id(),
                project_id: project_id.to_string(),
                title: title.to_string(),
                notes: notes.clone(),
                tag_ids: tag_ids.clone(),
                order: self.next_repeat_order,
                repeat_cycle: t.cycle,
                repeat_every: t.repeat_every,
                monday: t.weekdays[0],
                tuesday: t.weekdays[1],
                wednesday: t.weekdays[2],
                thursday: t.weekdays[3],
                friday: t.weekdays[4],
                saturday: t.weekdays[5],
                sunday: t.weekdays[6],
                start_date: t.start_date,
                quick_setting: t.quick_setting,
                is_paused: false,
            };
            self.next_repeat_order += 1;
            repeat_cfg_id = Some(cfg.id.clone());
            self.repeat_cfgs.insert(cfg.id.clone(), cfg);
            summary.repeat_cfgs += 1;
        }

        let task = Task {
            id: task_id.clone(),
            project_id: project_id.to_string(),
            title: title.to_string(),
            is_done,
            done_on,
            created,
            modified,
            due_day,
            due_with_time,
            has_planned_time,
            reminder_id,
            remind_at,
            tag_ids,
            sub_task_ids,
            parent_id: None,
            notes,
            repeat_cfg_id,
        };

        // Parent before its subtasks keeps the table in source order.
        self.tasks.insert(task_id.clone(), task);
        for sub in sub_tasks {
            self.tasks.insert(sub.id.clone(), sub);
        }
        summary.tasks += 1;

        // Project side of the membership link.
        if let Some(project) = self.projects.get_mut(project_id) {
            project.task_ids.push(task_id);
        }
    }
}
