//! Migration planning
//!
//! Turns a layout and its classification into the ordered list of steps.
//! Pure: no I/O, same input always gives the same plan.

use tracing::debug;

use crate::types::{
    Classification, LegacyLayout, MigrationPlan, MigrationStep, RenameMode, StepKind, StepStatus,
};

pub struct MigrationPlanner;

impl MigrationPlanner {
    pub fn plan(
        layout: &LegacyLayout,
        classification: &Classification,
        mode: RenameMode,
    ) -> MigrationPlan {
        let mut steps = Vec::new();

        if Self::includes_rename_auto(layout, classification, mode) {
            steps.push(MigrationStep::RenameAuto {
                mode,
                status: StepStatus::Pending,
            });
        }
        if mode != RenameMode::None && classification.has_manual() {
            steps.push(MigrationStep::pending(StepKind::RenameManual));
        }
        if !layout.support_file.is_disabled() {
            steps.push(MigrationStep::pending(StepKind::RenameSupport));
        }
        if layout.uses_component_testing {
            steps.push(MigrationStep::pending(StepKind::SetupComponent));
        }
        steps.push(MigrationStep::pending(StepKind::ConfigFile));

        let plan = MigrationPlan::from_steps(steps);
        debug!("Planned steps {:?} (rename mode {})", plan.kinds(), mode);
        plan
    }

    fn includes_rename_auto(
        layout: &LegacyLayout,
        classification: &Classification,
        mode: RenameMode,
    ) -> bool {
        match mode {
            RenameMode::All | RenameMode::None => classification.has_auto(),
            RenameMode::FolderOnly => {
                layout.integration_folder.is_default && !classification.e2e_specs.is_empty()
            }
        }
    }
}
