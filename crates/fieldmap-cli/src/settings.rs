use std::path::{Path, PathBuf};

use fieldmap_mapping::AutoMapOptions;
use serde::{Deserialize, Serialize};

use crate::CliError;

pub const DEFAULT_SETTINGS_FILE: &str = "fieldmap.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    /// Suggestions must score strictly above this to be auto-mapped.
    pub auto_map_min_confidence: f64,
    /// `tracing` filter directives, overridden by `RUST_LOG`.
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Append logs here instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            auto_map_min_confidence: AutoMapOptions::default().min_confidence,
            log_filter: "info".to_string(),
            log_format: LogFormat::Text,
            log_file: None,
        }
    }
}

impl CliSettings {
    pub fn auto_map_options(&self) -> AutoMapOptions {
        AutoMapOptions {
            min_confidence: self.auto_map_min_confidence,
        }
    }
}

/// Read settings from `path`, or the default file in the working directory.
///
/// A missing file yields defaults; an explicitly named missing file is an error.
pub fn load_settings(path: Option<&Path>) -> Result<CliSettings, CliError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    if !explicit && !path.exists() {
        return Ok(CliSettings::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let settings: CliSettings = toml::from_str(&content)?;
    if !(0.0..=100.0).contains(&settings.auto_map_min_confidence) {
        return Err(CliError::InvalidConfig(format!(
            "auto_map_min_confidence must be between 0 and 100, got {}",
            settings.auto_map_min_confidence
        )));
    }
    Ok(settings)
}
