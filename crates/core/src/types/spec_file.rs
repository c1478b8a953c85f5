use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// The testing type a spec belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    E2e,
    Component,
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecKind::E2e => write!(f, "e2e"),
            SpecKind::Component => write!(f, "component"),
        }
    }
}

/// Why a spec cannot be renamed without the user's say-so
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum ManualReason {
    /// Neither the folder nor the glob is the default
    AmbiguousPattern,
    /// Another spec computes the same target path
    Collision { with: PathBuf },
    /// The target path is already taken on disk
    TargetExists,
}

impl fmt::Display for ManualReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManualReason::AmbiguousPattern => {
                write!(f, "custom folder and custom spec pattern")
            }
            ManualReason::Collision { with } => {
                write!(f, "target collides with {}", with.display())
            }
            ManualReason::TargetExists => write!(f, "target already exists"),
        }
    }
}

/// What the migration intends to do with a spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Disposition {
    Auto {
        new_path: PathBuf,
    },
    Manual {
        #[serde(flatten)]
        reason: ManualReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        candidate: Option<PathBuf>,
    },
    /// Already follows the conventions the new config will declare
    Keep,
}

/// A spec file found in a legacy folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecFile {
    pub old_path: PathBuf,
    pub kind: SpecKind,
    pub matches_default_pattern: bool,
    pub disposition: Disposition,
}

impl SpecFile {
    pub fn new(
        old_path: impl Into<PathBuf>,
        kind: SpecKind,
        matches_default_pattern: bool,
        disposition: Disposition,
    ) -> Self {
        Self {
            old_path: old_path.into(),
            kind,
            matches_default_pattern,
            disposition,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self.disposition, Disposition::Auto { .. })
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.disposition, Disposition::Manual { .. })
    }

    /// The computed target path, when one exists
    pub fn candidate(&self) -> Option<&Path> {
        match &self.disposition {
            Disposition::Auto { new_path } => Some(new_path),
            Disposition::Manual { candidate, .. } => candidate.as_deref(),
            Disposition::Keep => None,
        }
    }
}

/// Result of classifying every spec of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub e2e_specs: Vec<SpecFile>,
    pub component_specs: Vec<SpecFile>,
}

impl Classification {
    pub fn all(&self) -> impl Iterator<Item = &SpecFile> {
        self.e2e_specs.iter().chain(self.component_specs.iter())
    }

    pub fn auto_specs(&self) -> impl Iterator<Item = &SpecFile> {
        self.all().filter(|s| s.is_auto())
    }

    pub fn manual_specs(&self) -> impl Iterator<Item = &SpecFile> {
        self.all().filter(|s| s.is_manual())
    }

    pub fn has_auto(&self) -> bool {
        self.auto_specs().next().is_some()
    }

    pub fn has_manual(&self) -> bool {
        self.manual_specs().next().is_some()
    }

    pub fn find(&self, old_path: &Path) -> Option<&SpecFile> {
        self.all().find(|s| s.old_path == old_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_disposition_serialization() {
        let spec = SpecFile::new(
            "cypress/integration/a_spec.js",
            SpecKind::E2e,
            true,
            Disposition::Manual {
                reason: ManualReason::TargetExists,
                candidate: Some(PathBuf::from("cypress/e2e/a.cy.js")),
            },
        );
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["disposition"]["type"], "manual");
        assert_eq!(json["disposition"]["reason"], "targetExists");
        assert_eq!(json["disposition"]["candidate"], "cypress/e2e/a.cy.js");
    }
}
