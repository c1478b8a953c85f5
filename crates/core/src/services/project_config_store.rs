//! Default config store backed by a [`FileSystem`]

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{ConfigFormat, LegacyConfig, NewConfigFile};
use crate::error::{Error, Result};
use crate::interfaces::{ConfigStore, FileSystem, StoredConfig};

/// Reads and writes config files at the project root
pub struct ProjectConfigStore {
    fs: Arc<dyn FileSystem>,
    legacy_file: PathBuf,
}

impl ProjectConfigStore {
    pub fn new(fs: Arc<dyn FileSystem>, legacy_file: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            legacy_file: legacy_file.into(),
        }
    }
}

impl ConfigStore for ProjectConfigStore {
    fn legacy_path(&self) -> PathBuf {
        self.legacy_file.clone()
    }

    fn read_legacy_config(&self) -> Result<Option<LegacyConfig>> {
        if !self.fs.exists(&self.legacy_file)? {
            return Ok(None);
        }
        let contents = self.fs.read_to_string(&self.legacy_file)?;
        let config = LegacyConfig::from_json(&contents)
            .map_err(|reason| Error::config_read(&self.legacy_file, reason))?;
        debug!("Read legacy config {}", self.legacy_file.display());
        Ok(Some(config))
    }

    fn read_config(&self) -> Result<Option<StoredConfig>> {
        if let Some(legacy) = self.read_legacy_config()? {
            return Ok(Some(StoredConfig::Legacy(legacy)));
        }
        let Some(path) = self.existing_config()? else {
            return Ok(None);
        };
        let contents = self.fs.read_to_string(&path)?;
        let config =
            NewConfigFile::parse(&path, &contents).map_err(|reason| Error::config_read(&path, reason))?;
        debug!("Read current config {}", path.display());
        Ok(Some(StoredConfig::Current(config)))
    }

    fn existing_config(&self) -> Result<Option<PathBuf>> {
        for format in ConfigFormat::ALL {
            let path = format.file_name();
            if self.fs.exists(&path)? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    fn write_config(&self, format: ConfigFormat, content: &str) -> Result<PathBuf> {
        let path = format.file_name();
        self.fs.write_durable(&path, content)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    fn remove_legacy_config(&self) -> Result<()> {
        if self.fs.exists(&self.legacy_file)? {
            self.fs.remove_file(&self.legacy_file)?;
            info!("Removed legacy config {}", self.legacy_file.display());
        }
        Ok(())
    }
}
