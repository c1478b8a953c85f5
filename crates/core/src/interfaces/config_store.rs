//! Config store interface
//!
//! Locates, reads and writes the project's test-runner config files.

use std::path::PathBuf;

use crate::config::{ConfigFormat, LegacyConfig, NewConfigFile};
use crate::error::Result;

/// A config file found at the project root
#[derive(Debug, Clone, PartialEq)]
pub enum StoredConfig {
    /// The legacy `.json` config
    Legacy(LegacyConfig),
    /// A current-format config in one of the script formats
    Current(NewConfigFile),
}

pub trait ConfigStore: Send + Sync {
    /// Project-relative path of the legacy config file
    fn legacy_path(&self) -> PathBuf;

    /// Read the legacy config. `Ok(None)` when it does not exist;
    /// a malformed file is a `ConfigReadError`.
    fn read_legacy_config(&self) -> Result<Option<LegacyConfig>>;

    /// Read whichever config is present, legacy first
    fn read_config(&self) -> Result<Option<StoredConfig>>;

    /// Path of an existing current-format config, if any
    fn existing_config(&self) -> Result<Option<PathBuf>>;

    /// Durably write a current-format config and return its path
    fn write_config(&self, format: ConfigFormat, content: &str) -> Result<PathBuf>;

    /// Delete the legacy config. A missing file is not an error.
    fn remove_legacy_config(&self) -> Result<()>;
}
