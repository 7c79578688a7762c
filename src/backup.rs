//! Backup envelope: the versioned document the destination imports.

use crate::error::ConvertResult;
use crate::model::{
    EntityTable, GlobalConfig, MenuNode, Project, Reminder, RepeatCfg, Tag, Task,
};
use serde::{Deserialize, Serialize};

/// Destination model version this tool writes.
pub const CROSS_MODEL_VERSION: f64 = 4.0;

/// A complete backup document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    /// Conversion run timestamp in epoch milliseconds.
    pub timestamp: i64,
    pub cross_model_version: f64,
    pub data: BackupData,
}

/// The flat entity tables of a backup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub project: EntityTable<Project>,
    pub task: EntityTable<Task>,
    pub tag: EntityTable<Tag>,
    pub task_repeat_cfg: EntityTable<RepeatCfg>,
    pub reminders: Vec<Reminder>,
    pub project_tree: Vec<MenuNode>,
    pub tag_tree: Vec<MenuNode>,
    pub global_config: GlobalConfig,
}

impl Backup {
    /// Wrap entity tables in a fresh envelope stamped with the run time.
    pub fn new(timestamp: i64, data: BackupData) -> Self {
        Self {
            timestamp,
            cross_model_version: CROSS_MODEL_VERSION,
            data,
        }
    }

    /// Load a backup from JSON data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a backup from a file (supports both plain JSON and gzip).
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

        if magic == [0x1f, 0x8b] {
            let decoder = flate2::read::GzDecoder::new(reader);
            Ok(serde_json::from_reader(decoder)?)
        } else {
            Ok(serde_json::from_reader(reader)?)
        }
    }

    /// Serialize to JSON with pretty formatting.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_roundtrip() {
        let backup = Backup::new(1_700_000_000_000, BackupData::default());

        let json = backup.to_json_pretty().unwrap();
        let loaded = Backup::from_json(&json).unwrap();

        assert_eq!(loaded.timestamp, backup.timestamp);
        assert_eq!(loaded.cross_model_version, CROSS_MODEL_VERSION);
        assert!(loaded.data.task.is_empty());
    }

    #[test]
    fn envelope_uses_camel_case_keys() {
        let backup = Backup::new(1, BackupData::default());
        let value = serde_json::to_value(&backup).unwrap();

        assert!(value.get("crossModelVersion").is_some());
        assert!(value["data"].get("taskRepeatCfg").is_some());
        assert!(value["data"].get("projectTree").is_some());
        assert!(value["data"].get("globalConfig").is_some());
        assert_eq!(value["data"]["globalConfig"]["misc"]["firstDayOfWeek"], 1);
    }
}
