//! Configuration loading and management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conversion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub folders: FolderConfig,

    /// Project title used for source lists without a usable name.
    #[serde(default = "default_fallback_list_title")]
    pub fallback_list_title: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            theme: ThemeConfig::default(),
            folders: FolderConfig::default(),
            fallback_list_title: default_fallback_list_title(),
        }
    }
}

fn default_fallback_list_title() -> String {
    "Imported tasks".to_string()
}

/// Colors assigned to created entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Accent color for every imported project.
    #[serde(default = "default_project_color")]
    pub project_color: String,

    /// Accent color for every discovered tag.
    #[serde(default = "default_tag_color")]
    pub tag_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            project_color: default_project_color(),
            tag_color: default_tag_color(),
        }
    }
}

fn default_project_color() -> String {
    "#29a1aa".to_string()
}

fn default_tag_color() -> String {
    "#a05db1".to_string()
}

/// Titles of the sidebar folders the import is grouped under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    #[serde(default = "default_project_folder_title")]
    pub project_folder_title: String,

    #[serde(default = "default_tag_folder_title")]
    pub tag_folder_title: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            project_folder_title: default_project_folder_title(),
            tag_folder_title: default_tag_folder_title(),
        }
    }
}

fn default_project_folder_title() -> String {
    "Imported".to_string()
}

fn default_tag_folder_title() -> String {
    "Tags".to_string()
}

impl ConvertConfig {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ConvertConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations or return defaults.
    pub fn load_or_default() -> Self {
        // Try $TODOPORT_CONFIG
        if let Ok(path) = std::env::var("TODOPORT_CONFIG")
            && let Ok(config) = Self::load(&path)
        {
            return config;
        }

        // Try ./todoport.yaml
        if let Ok(config) = Self::load("todoport.yaml") {
            return config;
        }

        // Try ~/.todoport/config.yaml
        if let Some(home) = dirs::home_dir()
            && let Ok(config) = Self::load(home.join(".todoport").join("config.yaml"))
        {
            return config;
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated() {
        let config = ConvertConfig::default();
        assert_eq!(config.theme.project_color, "#29a1aa");
        assert_eq!(config.theme.tag_color, "#a05db1");
        assert_eq!(config.folders.project_folder_title, "Imported");
        assert_eq!(config.folders.tag_folder_title, "Tags");
        assert_eq!(config.fallback_list_title, "Imported tasks");
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config: ConvertConfig = serde_yaml::from_str(
            "theme:\n  tag_color: \"#ff0000\"\nfallback_list_title: Misc\n",
        )
        .expect("Failed to parse config");

        assert_eq!(config.theme.tag_color, "#ff0000");
        assert_eq!(config.theme.project_color, "#29a1aa");
        assert_eq!(config.fallback_list_title, "Misc");
        assert_eq!(config.folders.project_folder_title, "Imported");
    }
}
