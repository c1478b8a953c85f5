use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use specmigrate_core::{
    FileSystem, ProjectConfigStore, Settings, StdFileSystem, WizardController,
};

/// Resolve the project root from `--cwd` or the current directory
pub fn project_root(cwd: Option<&str>) -> Result<PathBuf> {
    let root = match cwd {
        Some(cwd) => PathBuf::from(cwd),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    root.canonicalize()
        .with_context(|| format!("Failed to canonicalize project root {}", root.display()))
}

/// Load the project's settings and start a migration session
pub fn open_wizard(root: &Path) -> Result<(Settings, WizardController)> {
    let settings = Settings::load_for_project(root)?;
    debug!("Using settings {:?}", settings);

    let fs: Arc<dyn FileSystem> =
        Arc::new(StdFileSystem::new(root).with_ignored_dirs(settings.ignore_dirs.clone()));
    let store = Arc::new(ProjectConfigStore::new(
        fs.clone(),
        settings.legacy_config_file.clone(),
    ));
    let wizard = WizardController::start(fs, store, settings.clone())
        .with_context(|| format!("Cannot start migration in {}", root.display()))?;
    Ok((settings, wizard))
}
