use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// A folder setting together with whether it is the project default
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSetting {
    pub path: PathBuf,
    pub is_default: bool,
}

impl FolderSetting {
    pub fn new(path: impl Into<PathBuf>, is_default: bool) -> Self {
        Self {
            path: path.into(),
            is_default,
        }
    }
}

/// A spec glob together with whether it is the project default
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobSetting {
    pub pattern: String,
    pub is_default: bool,
}

impl GlobSetting {
    pub fn new(pattern: impl Into<String>, is_default: bool) -> Self {
        Self {
            pattern: pattern.into(),
            is_default,
        }
    }
}

/// The support file declaration. `Disabled` mirrors `supportFile: false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportFile {
    Disabled,
    Path(PathBuf),
}

impl SupportFile {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SupportFile::Disabled => None,
            SupportFile::Path(p) => Some(p),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, SupportFile::Disabled)
    }
}

impl Serialize for SupportFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SupportFile::Disabled => serializer.serialize_bool(false),
            SupportFile::Path(p) => serializer.serialize_str(&p.to_string_lossy()),
        }
    }
}

/// Immutable snapshot of the legacy layout settings of a project.
///
/// Read once at wizard start. `uses_component_testing` implies
/// `component_folder` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLayout {
    pub integration_folder: FolderSetting,
    pub test_files: GlobSetting,
    pub component_folder: Option<FolderSetting>,
    pub support_file: SupportFile,
    pub uses_component_testing: bool,
    /// Patterns from `ignoreTestFiles`; matching files are never specs
    pub ignore_test_files: Vec<String>,
    /// Plugins file found on disk, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins_file: Option<PathBuf>,
}

impl LegacyLayout {
    pub fn new(
        integration_folder: FolderSetting,
        test_files: GlobSetting,
        component_folder: Option<FolderSetting>,
        support_file: SupportFile,
    ) -> Self {
        let uses_component_testing = component_folder.is_some();
        Self {
            integration_folder,
            test_files,
            component_folder,
            support_file,
            uses_component_testing,
            ignore_test_files: Vec::new(),
            plugins_file: None,
        }
    }

    pub fn with_ignore_test_files(mut self, patterns: Vec<String>) -> Self {
        self.ignore_test_files = patterns;
        self
    }

    pub fn with_plugins_file(mut self, plugins_file: Option<PathBuf>) -> Self {
        self.plugins_file = plugins_file;
        self
    }

    /// Both the e2e folder and the spec glob were customized
    pub fn is_fully_custom_e2e(&self) -> bool {
        !self.integration_folder.is_default && !self.test_files.is_default
    }
}
