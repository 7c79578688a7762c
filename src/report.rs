//! Conversion run summary.

use serde::Serialize;
use tracing::warn;

/// Counts and warnings accumulated over one conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionSummary {
    pub projects: usize,
    pub tasks: usize,
    pub sub_tasks: usize,
    pub tags: usize,
    pub repeat_cfgs: usize,
    pub reminders: usize,
    pub skipped_tasks: usize,
    /// Human-readable notes about lossy mappings and degraded records.
    pub warnings: Vec<String>,
}

impl ConversionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }
}
