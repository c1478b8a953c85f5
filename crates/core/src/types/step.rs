use serde::Serialize;
use std::fmt;

/// Identifies a wizard step. Also used as the step id by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    RenameAuto,
    RenameManual,
    RenameSupport,
    SetupComponent,
    ConfigFile,
}

impl StepKind {
    /// Fixed execution order of all steps
    pub const ORDER: [StepKind; 5] = [
        StepKind::RenameAuto,
        StepKind::RenameManual,
        StepKind::RenameSupport,
        StepKind::SetupComponent,
        StepKind::ConfigFile,
    ];

    pub fn is_rename(self) -> bool {
        matches!(self, StepKind::RenameAuto | StepKind::RenameManual)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::RenameAuto => "renameAuto",
            StepKind::RenameManual => "renameManual",
            StepKind::RenameSupport => "renameSupport",
            StepKind::SetupComponent => "setupComponent",
            StepKind::ConfigFile => "configFile",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

impl StepStatus {
    pub fn is_resolved(self) -> bool {
        !matches!(self, StepStatus::Pending)
    }
}

/// The user's decision for the automatic rename step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenameMode {
    /// Rename folders and spec files
    #[default]
    All,
    /// Rename the integration folder only, keep spec file names
    FolderOnly,
    /// Keep everything as it is
    None,
}

impl std::str::FromStr for RenameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(RenameMode::All),
            "folder-only" | "folder_only" | "folder" => Ok(RenameMode::FolderOnly),
            "none" | "keep" => Ok(RenameMode::None),
            other => Err(format!("unknown rename mode '{other}'")),
        }
    }
}

impl fmt::Display for RenameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenameMode::All => "all",
            RenameMode::FolderOnly => "folder-only",
            RenameMode::None => "none",
        };
        write!(f, "{name}")
    }
}

/// One entry of a migration plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum MigrationStep {
    RenameAuto { mode: RenameMode, status: StepStatus },
    RenameManual { status: StepStatus },
    RenameSupport { status: StepStatus },
    SetupComponent { status: StepStatus },
    ConfigFile { status: StepStatus },
}

impl MigrationStep {
    pub fn pending(kind: StepKind) -> Self {
        let status = StepStatus::Pending;
        match kind {
            StepKind::RenameAuto => MigrationStep::RenameAuto {
                mode: RenameMode::All,
                status,
            },
            StepKind::RenameManual => MigrationStep::RenameManual { status },
            StepKind::RenameSupport => MigrationStep::RenameSupport { status },
            StepKind::SetupComponent => MigrationStep::SetupComponent { status },
            StepKind::ConfigFile => MigrationStep::ConfigFile { status },
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            MigrationStep::RenameAuto { .. } => StepKind::RenameAuto,
            MigrationStep::RenameManual { .. } => StepKind::RenameManual,
            MigrationStep::RenameSupport { .. } => StepKind::RenameSupport,
            MigrationStep::SetupComponent { .. } => StepKind::SetupComponent,
            MigrationStep::ConfigFile { .. } => StepKind::ConfigFile,
        }
    }

    pub fn status(&self) -> StepStatus {
        match self {
            MigrationStep::RenameAuto { status, .. }
            | MigrationStep::RenameManual { status }
            | MigrationStep::RenameSupport { status }
            | MigrationStep::SetupComponent { status }
            | MigrationStep::ConfigFile { status } => *status,
        }
    }

    pub(crate) fn set_status(&mut self, new_status: StepStatus) {
        match self {
            MigrationStep::RenameAuto { status, .. }
            | MigrationStep::RenameManual { status }
            | MigrationStep::RenameSupport { status }
            | MigrationStep::SetupComponent { status }
            | MigrationStep::ConfigFile { status } => *status = new_status,
        }
    }
}

/// Ordered list of the steps that apply to a project.
///
/// Only step status changes after planning, and only through the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    steps: Vec<MigrationStep>,
}

impl MigrationPlan {
    pub(crate) fn from_steps(mut steps: Vec<MigrationStep>) -> Self {
        steps.sort_by_key(MigrationStep::kind);
        Self { steps }
    }

    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(MigrationStep::kind).collect()
    }

    pub fn contains(&self, kind: StepKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn get(&self, kind: StepKind) -> Option<&MigrationStep> {
        self.steps.iter().find(|s| s.kind() == kind)
    }

    pub(crate) fn get_mut(&mut self, kind: StepKind) -> Option<&mut MigrationStep> {
        self.steps.iter_mut().find(|s| s.kind() == kind)
    }

    /// Mode of the automatic rename step, if it is part of the plan
    pub fn rename_mode(&self) -> Option<RenameMode> {
        self.steps.iter().find_map(|s| match s {
            MigrationStep::RenameAuto { mode, .. } => Some(*mode),
            _ => None,
        })
    }

    /// First step still waiting for the user
    pub fn first_pending(&self) -> Option<StepKind> {
        self.steps
            .iter()
            .find(|s| !s.status().is_resolved())
            .map(MigrationStep::kind)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
