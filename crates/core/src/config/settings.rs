use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::legacy::LEGACY_CONFIG_FILE;

pub const SETTINGS_FILE: &str = ".specmigrate.json";

/// Tool settings, read from `.specmigrate.json` at the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
    /// Name of the legacy config file
    pub legacy_config_file: String,

    /// Whether the manual rename step may be skipped and done later
    pub allow_defer_manual_renames: bool,

    /// Whether the support file rename may be skipped
    pub allow_defer_support_rename: bool,

    /// Directory names never walked while looking for specs
    pub ignore_dirs: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            legacy_config_file: LEGACY_CONFIG_FILE.to_string(),
            allow_defer_manual_renames: true,
            allow_defer_support_rename: true,
            ignore_dirs: vec!["node_modules".to_string()],
        }
    }
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::config_read(path, format!("Failed to parse settings: {e}")))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| Error::io(path, e))
    }

    pub fn settings_path(project_root: &Path) -> PathBuf {
        project_root.join(SETTINGS_FILE)
    }

    /// Load the project's settings, falling back to defaults when absent
    pub fn load_for_project(project_root: &Path) -> Result<Self> {
        let path = Self::settings_path(project_root);
        if path.exists() {
            tracing::debug!("Loading settings from {}", path.display());
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }
}
