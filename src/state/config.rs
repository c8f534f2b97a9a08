//! Startup configuration for both tools.
//!
//! The original tools hard-coded the image folder and label file; here they
//! are resolved at startup instead, in order of preference:
//! 1. first command-line argument (the image folder)
//! 2. the tool's JSON config file under the user's config directory
//! 3. a native folder picker dialog (handled by the binaries)
//!
//! Whatever the user ends up with is written back to the config file so the
//! next run reopens the same folder.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Default bounding box for the on-screen preview
pub const DEFAULT_MAX_WIDTH: u32 = 600;
pub const DEFAULT_MAX_HEIGHT: u32 = 600;

/// Persisted startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Folder containing the images to process
    pub image_folder: Option<PathBuf>,
    /// Output file for label records (labeler only).
    /// Defaults to `labels.txt` inside the image folder when unset.
    pub label_file: Option<PathBuf>,
    /// Maximum preview width in pixels
    pub max_width: u32,
    /// Maximum preview height in pixels
    pub max_height: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            image_folder: None,
            label_file: None,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl ToolConfig {
    /// Path of the config file for one tool, e.g. ~/.config/imgprep/cropper.json
    pub fn config_path(tool: &str) -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("imgprep");
        path.push(format!("{tool}.json"));
        Some(path)
    }

    /// Load the config for one tool, falling back to defaults on any failure.
    ///
    /// A missing or unparsable config file is not an error at startup; the
    /// folder picker covers for it.
    pub fn load(tool: &str) -> Self {
        let Some(path) = Self::config_path(tool) else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("ignoring unparsable config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Write the config for one tool as pretty-printed JSON.
    pub fn save(&self, tool: &str) -> Result<(), ToolError> {
        let Some(path) = Self::config_path(tool) else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ToolError::ConfigWrite {
                path: path.clone(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).expect("ToolConfig always serializes");
        std::fs::write(&path, json).map_err(|e| ToolError::ConfigWrite {
            path: path.clone(),
            source: e,
        })?;

        log::info!("config saved to {}", path.display());
        Ok(())
    }

    /// Output path for label records: configured file, or `labels.txt`
    /// next to the images.
    pub fn label_file_for(&self, folder: &std::path::Path) -> PathBuf {
        self.label_file
            .clone()
            .unwrap_or_else(|| folder.join("labels.txt"))
    }
}

/// Image folder passed on the command line, if any
pub fn folder_from_args() -> Option<PathBuf> {
    std::env::args_os().nth(1).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.image_folder, None);
        assert_eq!(config.max_width, DEFAULT_MAX_WIDTH);
        assert_eq!(config.max_height, DEFAULT_MAX_HEIGHT);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ToolConfig {
            image_folder: Some(PathBuf::from("/data/images")),
            label_file: Some(PathBuf::from("/data/labels.txt")),
            max_width: 500,
            max_height: 500,
        };

        let json = serde_json::to_string(&config).unwrap();
        let restored: ToolConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let restored: ToolConfig =
            serde_json::from_str(r#"{"image_folder": "/data/images"}"#).unwrap();

        assert_eq!(restored.image_folder, Some(PathBuf::from("/data/images")));
        assert_eq!(restored.max_width, DEFAULT_MAX_WIDTH);
    }

    #[test]
    fn test_label_file_defaults_next_to_images() {
        let config = ToolConfig::default();
        let folder = PathBuf::from("/data/images");
        assert_eq!(config.label_file_for(&folder), folder.join("labels.txt"));

        let config = ToolConfig {
            label_file: Some(PathBuf::from("/elsewhere/out.tsv")),
            ..Default::default()
        };
        assert_eq!(
            config.label_file_for(&folder),
            PathBuf::from("/elsewhere/out.tsv")
        );
    }
}
