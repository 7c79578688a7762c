//! The conversion engine.
//!
//! Conversion runs in two passes over the source export. The first pass
//! discovers every tag signal (importance flags, categories, hashtags) so
//! the full tag set exists before any task references it. The second pass
//! builds projects, tasks, subtasks, repeat configs, and reminders in
//! source order, wiring both sides of every relationship as it goes.

pub mod builder;
pub mod recurrence;
pub mod tags;
pub mod tree;

use crate::backup::{Backup, BackupData};
use crate::config::ConvertConfig;
use crate::model::GlobalConfig;
use crate::report::ConversionSummary;
use crate::source::TodoExport;
use builder::EntityBuilder;
use chrono::Utc;
use tags::TagRegistry;
use tracing::info;

/// Convert a source export into a destination backup.
///
/// The clock is sampled exactly once; every fallback timestamp in the
/// output refers to the same instant.
pub fn convert(export: &TodoExport, config: &ConvertConfig) -> (Backup, ConversionSummary) {
    let now_utc = Utc::now();
    let now = now_utc.timestamp_millis();
    let mut summary = ConversionSummary::new();

    let mut registry = TagRegistry::discover(export, &config.theme.tag_color, now);

    let mut builder = EntityBuilder::new(&mut registry, config, now_utc);
    for list in &export.lists {
        builder.build_list(list, &mut summary);
    }
    let built = builder.finish();

    let tag_table = registry.into_table();
    summary.tags = tag_table.len();

    let project_tree = tree::project_tree(&built.projects, &config.folders.project_folder_title);
    let tag_tree = tree::tag_tree(&tag_table, &config.folders.tag_folder_title);

    info!(
        projects = summary.projects,
        tasks = summary.tasks,
        tags = summary.tags,
        "Conversion finished"
    );

    let data = BackupData {
        project: built.projects,
        task: built.tasks,
        tag: tag_table,
        task_repeat_cfg: built.repeat_cfgs,
        reminders: built.reminders,
        project_tree,
        tag_tree,
        global_config: GlobalConfig::default(),
    };
    (Backup::new(now, data), summary)
}
