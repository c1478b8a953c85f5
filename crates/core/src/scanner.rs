//! Project layout scanner
//!
//! Reads the project's config plus the file system and produces the
//! normalized [`LegacyLayout`]. Never writes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::legacy::{
    DEFAULT_COMPONENT_FOLDER, DEFAULT_IGNORE_TEST_FILES, DEFAULT_INTEGRATION_FOLDER,
    DEFAULT_PLUGINS_FILE_STEM, DEFAULT_SUPPORT_FILE_STEM, DEFAULT_TEST_FILES, SCRIPT_EXTENSIONS,
};
use crate::config::target::{
    DEFAULT_E2E_FOLDER, DEFAULT_E2E_SUPPORT_STEM, MIGRATED_SPEC_GLOB,
};
use crate::config::{Declared, LegacyConfig, NewConfigFile, TestingType};
use crate::error::{Error, Result};
use crate::interfaces::{ConfigStore, FileSystem, StoredConfig};
use crate::types::{FolderSetting, GlobSetting, LegacyLayout, SupportFile};

pub struct ProjectLayoutScanner {
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn ConfigStore>,
}

impl ProjectLayoutScanner {
    pub fn new(fs: Arc<dyn FileSystem>, store: Arc<dyn ConfigStore>) -> Self {
        Self { fs, store }
    }

    /// Scan whichever config the project has. Legacy configs win.
    pub fn scan(&self) -> Result<LegacyLayout> {
        match self.store.read_config()? {
            Some(StoredConfig::Legacy(config)) => self.layout_from_legacy(&config),
            Some(StoredConfig::Current(config)) => self.layout_from_current(&config),
            None => Err(self.not_found()),
        }
    }

    /// Scan the legacy config, failing when there is none
    pub fn scan_legacy(&self) -> Result<(LegacyConfig, LegacyLayout)> {
        let config = self
            .store
            .read_legacy_config()?
            .ok_or_else(|| self.not_found())?;
        let layout = self.layout_from_legacy(&config)?;
        Ok((config, layout))
    }

    fn not_found(&self) -> Error {
        Error::config_read(self.store.legacy_path(), "config file not found")
    }

    pub fn layout_from_legacy(&self, config: &LegacyConfig) -> Result<LegacyLayout> {
        let legacy_path = self.store.legacy_path();
        let invalid = |key: &str, expected: &str| {
            Error::config_read(&legacy_path, format!("{key} must be {expected}"))
        };

        let integration_folder = match config.lookup("integrationFolder", TestingType::E2e) {
            Declared::Missing => FolderSetting::new(DEFAULT_INTEGRATION_FOLDER, true),
            Declared::Value(folder) => folder_setting(&folder, DEFAULT_INTEGRATION_FOLDER),
            _ => return Err(invalid("integrationFolder", "a folder path")),
        };

        let test_files = match config.lookup("testFiles", TestingType::E2e) {
            Declared::Missing => GlobSetting::new(DEFAULT_TEST_FILES, true),
            Declared::Value(glob) => {
                let is_default = glob == DEFAULT_TEST_FILES;
                GlobSetting::new(glob, is_default)
            }
            Declared::List(globs) => {
                let pattern = join_globs(&globs).ok_or_else(|| invalid("testFiles", "non-empty"))?;
                let is_default = pattern == DEFAULT_TEST_FILES;
                GlobSetting::new(pattern, is_default)
            }
            Declared::False => return Err(invalid("testFiles", "a glob pattern")),
        };

        let component_folder = match config.lookup("componentFolder", TestingType::Component) {
            Declared::False => None,
            Declared::Value(folder) => Some(folder_setting(&folder, DEFAULT_COMPONENT_FOLDER)),
            Declared::Missing => self
                .fs
                .is_dir(Path::new(DEFAULT_COMPONENT_FOLDER))?
                .then(|| FolderSetting::new(DEFAULT_COMPONENT_FOLDER, true)),
            Declared::List(_) => return Err(invalid("componentFolder", "a folder path or false")),
        };

        let support_file = match config.lookup("supportFile", TestingType::E2e) {
            Declared::False => SupportFile::Disabled,
            Declared::Value(declared) => {
                let declared = normalize(&declared);
                SupportFile::Path(self.resolve_script(&declared)?.unwrap_or(declared))
            }
            Declared::Missing => self
                .resolve_script(Path::new(DEFAULT_SUPPORT_FILE_STEM))?
                .map(SupportFile::Path)
                .unwrap_or(SupportFile::Disabled),
            Declared::List(_) => return Err(invalid("supportFile", "a file path or false")),
        };

        let plugins_file = match config.lookup("pluginsFile", TestingType::E2e) {
            Declared::Value(declared) => self.resolve_script(&normalize(&declared))?,
            Declared::Missing => self.resolve_script(Path::new(DEFAULT_PLUGINS_FILE_STEM))?,
            _ => None,
        };

        let ignore_test_files = match config.lookup("ignoreTestFiles", TestingType::E2e) {
            Declared::Missing => vec![DEFAULT_IGNORE_TEST_FILES.to_string()],
            Declared::Value(glob) => vec![glob],
            Declared::List(globs) => globs,
            Declared::False => Vec::new(),
        };

        let layout = LegacyLayout::new(integration_folder, test_files, component_folder, support_file)
            .with_ignore_test_files(ignore_test_files)
            .with_plugins_file(plugins_file);
        debug!("Scanned legacy layout: {:?}", layout);
        Ok(layout)
    }

    /// Map a current-format config back onto the layout fields
    pub fn layout_from_current(&self, config: &NewConfigFile) -> Result<LegacyLayout> {
        let e2e = config.block("e2e");

        let (folder, glob) = e2e
            .and_then(|b| first_string(b.get("specPattern")))
            .map(|p| split_pattern(&p))
            .unwrap_or_else(|| (PathBuf::from(DEFAULT_E2E_FOLDER), MIGRATED_SPEC_GLOB.to_string()));
        let integration_folder = FolderSetting {
            is_default: folder == Path::new(DEFAULT_E2E_FOLDER),
            path: folder,
        };
        let test_files = GlobSetting {
            is_default: glob == MIGRATED_SPEC_GLOB,
            pattern: glob,
        };

        let component_folder = config.block("component").map(|block| {
            let folder = first_string(block.get("specPattern"))
                .map(|p| split_pattern(&p).0)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPONENT_FOLDER));
            FolderSetting {
                is_default: folder == Path::new(DEFAULT_COMPONENT_FOLDER),
                path: folder,
            }
        });

        let support_file = match e2e.and_then(|b| b.get("supportFile")) {
            Some(Value::Bool(false)) => SupportFile::Disabled,
            Some(Value::String(path)) => SupportFile::Path(normalize(path)),
            _ => {
                let stem = Path::new("cypress/support").join(DEFAULT_E2E_SUPPORT_STEM);
                self.resolve_script(&stem)?
                    .map(SupportFile::Path)
                    .unwrap_or(SupportFile::Disabled)
            }
        };

        let ignore_test_files = e2e
            .and_then(|b| b.get("excludeSpecPattern"))
            .map(string_list)
            .unwrap_or_default();
        let plugins_file = e2e
            .and_then(|b| first_string(b.get("setupNodeEvents")))
            .map(PathBuf::from);

        Ok(
            LegacyLayout::new(integration_folder, test_files, component_folder, support_file)
                .with_ignore_test_files(ignore_test_files)
                .with_plugins_file(plugins_file),
        )
    }

    /// Resolve a script path that may omit its extension or name a folder
    /// holding an `index` script
    fn resolve_script(&self, declared: &Path) -> Result<Option<PathBuf>> {
        let has_extension = declared
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| SCRIPT_EXTENSIONS.contains(&e));
        if has_extension {
            return Ok(self.fs.exists(declared)?.then(|| declared.to_path_buf()));
        }

        let mut candidates = Vec::new();
        for ext in SCRIPT_EXTENSIONS {
            candidates.push(declared.with_extension(ext));
        }
        for ext in SCRIPT_EXTENSIONS {
            candidates.push(declared.join(format!("index.{ext}")));
        }
        for candidate in candidates {
            if self.fs.exists(&candidate)? && !self.fs.is_dir(&candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

fn normalize(path: &str) -> PathBuf {
    let trimmed = path.trim_start_matches("./").trim_end_matches('/');
    PathBuf::from(trimmed)
}

fn folder_setting(declared: &str, default: &str) -> FolderSetting {
    let path = normalize(declared);
    let is_default = path == Path::new(default);
    FolderSetting::new(path, is_default)
}

fn join_globs(globs: &[String]) -> Option<String> {
    match globs {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(format!("{{{}}}", many.join(","))),
    }
}

fn first_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn is_glob_segment(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

/// Split a spec pattern into its literal folder prefix and the glob part
pub fn split_pattern(pattern: &str) -> (PathBuf, String) {
    let segments: Vec<&str> = pattern.split('/').collect();
    let literal = segments.iter().take_while(|s| !is_glob_segment(s)).count();

    // the last segment is a file pattern even when it has no wildcard
    let literal = literal.min(segments.len().saturating_sub(1));
    let folder: PathBuf = segments[..literal].iter().collect();
    (folder, segments[literal..].join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ProjectConfigStore, StdFileSystem};
    use std::fs;
    use tempfile::TempDir;

    fn scanner(root: &Path) -> ProjectLayoutScanner {
        let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem::new(root));
        let store = Arc::new(ProjectConfigStore::new(fs.clone(), "cypress.json"));
        ProjectLayoutScanner::new(fs, store)
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_defaults_resolved_against_disk() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "cypress.json", "{}");
        write(root, "cypress/support/index.ts", "");
        write(root, "cypress/plugins/index.js", "");

        let layout = scanner(root).scan().unwrap();
        assert_eq!(
            layout.integration_folder,
            FolderSetting::new("cypress/integration", true)
        );
        assert_eq!(layout.test_files, GlobSetting::new("**/*.*", true));
        assert_eq!(layout.component_folder, None);
        assert!(!layout.uses_component_testing);
        assert_eq!(
            layout.support_file,
            SupportFile::Path(PathBuf::from("cypress/support/index.ts"))
        );
        assert_eq!(layout.plugins_file, Some(PathBuf::from("cypress/plugins/index.js")));
        assert_eq!(layout.ignore_test_files, vec!["*.hot-update.js".to_string()]);
    }

    #[test]
    fn test_default_component_folder_on_disk_enables_component_testing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "cypress.json", "{}");
        write(root, "cypress/component/button.spec.js", "");

        let layout = scanner(root).scan().unwrap();
        assert_eq!(
            layout.component_folder,
            Some(FolderSetting::new("cypress/component", true))
        );
        assert!(layout.uses_component_testing);
        assert_eq!(layout.support_file, SupportFile::Disabled);
    }

    #[test]
    fn test_custom_values() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(
            root,
            "cypress.json",
            r#"{
                "integrationFolder": "./src/",
                "testFiles": "**/*.test.js",
                "componentFolder": false,
                "supportFile": false,
                "pluginsFile": false,
                "ignoreTestFiles": ["**/skip/**"]
            }"#,
        );

        let layout = scanner(root).scan().unwrap();
        assert_eq!(layout.integration_folder, FolderSetting::new("src", false));
        assert_eq!(layout.test_files, GlobSetting::new("**/*.test.js", false));
        assert!(layout.component_folder.is_none());
        assert!(layout.support_file.is_disabled());
        assert!(layout.plugins_file.is_none());
        assert_eq!(layout.ignore_test_files, vec!["**/skip/**".to_string()]);
    }

    #[test]
    fn test_declared_support_folder_resolves_index() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "cypress.json", r#"{ "supportFile": "cypress/support" }"#);
        write(root, "cypress/support/index.coffee", "");

        let layout = scanner(root).scan().unwrap();
        assert_eq!(
            layout.support_file,
            SupportFile::Path(PathBuf::from("cypress/support/index.coffee"))
        );
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let err = scanner(temp_dir.path()).scan().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("cypress.json"));
    }

    #[test]
    fn test_wrong_type_is_config_read_error() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "cypress.json", r#"{ "integrationFolder": false }"#);
        let err = scanner(temp_dir.path()).scan().unwrap_err();
        assert!(matches!(err, Error::ConfigReadError { .. }));
        assert!(err.to_string().contains("integrationFolder"));
    }

    #[test]
    fn test_split_pattern() {
        assert_eq!(
            split_pattern("cypress/e2e/**/*.cy.{js,ts}"),
            (PathBuf::from("cypress/e2e"), "**/*.cy.{js,ts}".to_string())
        );
        assert_eq!(
            split_pattern("src/specs/login.cy.js"),
            (PathBuf::from("src/specs"), "login.cy.js".to_string())
        );
        assert_eq!(split_pattern("**/*.cy.js"), (PathBuf::new(), "**/*.cy.js".to_string()));
    }
}
