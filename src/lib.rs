//! Project fixtures shared by the cross-crate tests

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use specmigrate_core::{
    ConfigStore, FileSystem, ProjectConfigStore, ProjectLayoutScanner, Result, Settings,
    StdFileSystem, WizardController,
};
use tempfile::TempDir;

/// A throwaway project directory
pub struct FixtureProject {
    dir: TempDir,
}

impl FixtureProject {
    /// A project with a legacy `cypress.json`
    pub fn with_legacy_config(config: Value) -> Self {
        let project = Self::empty();
        project.write("cypress.json", &config.to_string());
        project
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Add files with their own path as content
    pub fn with_files(self, files: &[&str]) -> Self {
        for file in files {
            self.write(file, file);
        }
        self
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, contents).expect("write fixture file");
    }

    pub fn abs(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.abs(relative).exists()
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.abs(relative)).expect("read fixture file")
    }

    pub fn fs(&self) -> Arc<dyn FileSystem> {
        Arc::new(StdFileSystem::new(self.dir.path()))
    }

    pub fn store(&self) -> Arc<dyn ConfigStore> {
        Arc::new(ProjectConfigStore::new(self.fs(), "cypress.json"))
    }

    pub fn scanner(&self) -> ProjectLayoutScanner {
        ProjectLayoutScanner::new(self.fs(), self.store())
    }

    pub fn wizard(&self) -> Result<WizardController> {
        self.wizard_with(Settings::default())
    }

    pub fn wizard_with(&self, settings: Settings) -> Result<WizardController> {
        WizardController::start(self.fs(), self.store(), settings)
    }
}
