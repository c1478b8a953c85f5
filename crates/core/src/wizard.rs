//! Migration wizard
//!
//! One controller per migration session. It owns the plan and is the only
//! place step status changes. Steps run strictly in plan order; the wizard
//! is done once the config file step is resolved.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::SpecClassifier;
use crate::classifier::naming::support_file_target;
use crate::config::target::{DEFAULT_E2E_FOLDER, DEFAULT_E2E_SUPPORT_STEM};
use crate::config::{LegacyConfig, NewConfigFile, Settings};
use crate::error::{Error, Result};
use crate::interfaces::{ConfigStore, FileSystem};
use crate::planner::MigrationPlanner;
use crate::renamer::{FileRenamer, RenameOutcome, RenameRecord};
use crate::rewriter::{ConfigRewriter, MigratedConventions};
use crate::scanner::ProjectLayoutScanner;
use crate::types::{
    Classification, LegacyLayout, MigrationPlan, MigrationStep, RenameMode, SpecFile, StepKind,
    StepStatus,
};

/// Where the wizard is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "step")]
pub enum WizardState {
    Step(StepKind),
    Done,
}

impl fmt::Display for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardState::Step(step) => write!(f, "{step}"),
            WizardState::Done => write!(f, "done"),
        }
    }
}

pub struct WizardController {
    settings: Settings,
    legacy: LegacyConfig,
    layout: LegacyLayout,
    classifier: SpecClassifier,
    renamer: FileRenamer,
    rewriter: ConfigRewriter,
    fs: Arc<dyn FileSystem>,
    classification: Classification,
    plan: MigrationPlan,
    mode: RenameMode,
    // pending steps that already moved files stay planned
    touched: HashSet<StepKind>,
    folder_renamed: bool,
    renamed_support_file: Option<PathBuf>,
    written_config: Option<NewConfigFile>,
    closed: bool,
}

impl WizardController {
    /// Scan, classify and plan. Fails when the legacy config is missing or
    /// unreadable, or when its spec patterns are invalid.
    pub fn start(
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn ConfigStore>,
        settings: Settings,
    ) -> Result<Self> {
        let scanner = ProjectLayoutScanner::new(fs.clone(), store.clone());
        let (legacy, layout) = scanner.scan_legacy()?;

        let classifier = SpecClassifier::new(fs.clone());
        let mode = RenameMode::default();
        let classification = classifier.classify_for(&layout, mode)?;
        let plan = MigrationPlanner::plan(&layout, &classification, mode);
        info!("Migration planned: {:?}", plan.kinds());

        Ok(Self {
            settings,
            legacy,
            layout,
            classifier,
            renamer: FileRenamer::new(fs.clone()),
            rewriter: ConfigRewriter::new(fs.clone(), store),
            fs,
            classification,
            plan,
            mode,
            touched: HashSet::new(),
            folder_renamed: false,
            renamed_support_file: None,
            written_config: None,
            closed: false,
        })
    }

    pub fn get_plan(&self) -> &MigrationPlan {
        &self.plan
    }

    pub fn layout(&self) -> &LegacyLayout {
        &self.layout
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn rename_mode(&self) -> RenameMode {
        self.mode
    }

    /// Renames applied during this session
    pub fn renames(&self) -> &[RenameRecord] {
        self.renamer.history()
    }

    /// The config written by the config file step
    pub fn written_config(&self) -> Option<&NewConfigFile> {
        self.written_config.as_ref()
    }

    pub fn state(&self) -> WizardState {
        if self.is_done() {
            return WizardState::Done;
        }
        self.plan
            .first_pending()
            .map_or(WizardState::Done, WizardState::Step)
    }

    /// The step waiting for the user, `None` once done
    pub fn current_step(&self) -> Option<StepKind> {
        match self.state() {
            WizardState::Step(step) => Some(step),
            WizardState::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.config_step_resolved()
    }

    /// `(resolved, total)` steps
    pub fn progress(&self) -> (usize, usize) {
        let resolved = self
            .plan
            .steps()
            .iter()
            .filter(|s| s.status().is_resolved())
            .count();
        (resolved, self.plan.len())
    }

    /// Run the current step and mark it completed. On failure the step
    /// stays pending; completed file operations stay on disk and a retry
    /// picks up where the last attempt stopped.
    pub fn proceed(&mut self, step: StepKind) -> Result<WizardState> {
        self.ensure_current(step)?;

        let renamed_before = self.renamer.history().len();
        let result = self.run_step(step);
        if self.renamer.history().len() > renamed_before {
            self.touched.insert(step);
        }
        if let Err(e) = result {
            warn!("Step {} failed: {}", step, e);
            if step.is_rename() {
                self.reclassify()?;
            }
            return Err(e);
        }

        self.resolve(step, StepStatus::Completed)?;
        Ok(self.state())
    }

    /// Mark the current step skipped. Allowed for the manual rename and
    /// support file steps when settings permit deferring them, and for the
    /// automatic rename step when nothing is being renamed.
    pub fn skip(&mut self, step: StepKind) -> Result<WizardState> {
        self.ensure_current(step)?;

        let allowed = match step {
            StepKind::RenameManual => self.settings.allow_defer_manual_renames,
            StepKind::RenameSupport => self.settings.allow_defer_support_rename,
            StepKind::RenameAuto => self.mode == RenameMode::None,
            StepKind::SetupComponent | StepKind::ConfigFile => false,
        };
        if !allowed {
            return Err(Error::SkipNotAllowed(step));
        }

        self.resolve(step, StepStatus::Skipped)?;
        info!("Skipped step {}", step);
        Ok(self.state())
    }

    /// Change the rename decision. Only possible before anything was
    /// renamed and before any rename step is resolved; specs are
    /// classified again for the new decision.
    pub fn change(&mut self, step: StepKind, decision: RenameMode) -> Result<WizardState> {
        self.ensure_open()?;
        let rename_resolved = self
            .plan
            .steps()
            .iter()
            .any(|s| s.kind().is_rename() && s.status().is_resolved());
        let reopenable = step == StepKind::RenameAuto
            && !self.config_step_resolved()
            && !rename_resolved
            && self.renamer.history().is_empty();
        if !reopenable {
            return Err(Error::DecisionNotApplicable(step));
        }

        info!("Rename decision changed from {} to {}", self.mode, decision);
        self.mode = decision;
        self.reclassify()?;
        Ok(self.state())
    }

    /// Rename a spec that needs manual resolution to a path the user chose
    pub fn resolve_manual(&mut self, old: &Path, new: &Path) -> Result<RenameOutcome> {
        self.ensure_open()?;
        let is_manual = self
            .classification
            .find(old)
            .is_some_and(|spec| spec.is_manual());
        if !is_manual {
            return Err(Error::InvalidTransition {
                step: StepKind::RenameManual,
                reason: format!("{} does not need a manual rename", old.display()),
            });
        }

        let outcome = self.renamer.rename_spec(old, new)?;
        self.reclassify()?;
        Ok(outcome)
    }

    /// A file was moved outside the wizard; classify again
    pub fn file_moved(&mut self, old: &Path, new: &Path) -> Result<()> {
        self.ensure_open()?;
        debug!("File moved outside the wizard: {} -> {}", old.display(), new.display());
        self.reclassify()
    }

    /// End the session. Pending steps stay pending and nothing already on
    /// disk is rolled back.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let pending: Vec<StepKind> = self
            .plan
            .steps()
            .iter()
            .filter(|s| !s.status().is_resolved())
            .map(MigrationStep::kind)
            .collect();
        info!("Migration wizard closed, pending steps: {:?}", pending);
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::WizardClosed);
        }
        Ok(())
    }

    fn ensure_current(&self, step: StepKind) -> Result<()> {
        self.ensure_open()?;
        match self.state() {
            WizardState::Step(current) if current == step => Ok(()),
            WizardState::Step(current) => Err(Error::InvalidTransition {
                step,
                reason: format!("current step is {current}"),
            }),
            WizardState::Done => Err(Error::InvalidTransition {
                step,
                reason: "the migration is already done".to_string(),
            }),
        }
    }

    fn run_step(&mut self, step: StepKind) -> Result<()> {
        match step {
            StepKind::RenameAuto => self.rename_auto(),
            StepKind::RenameManual => {
                let pending: Vec<PathBuf> = self
                    .classification
                    .manual_specs()
                    .map(|s| s.old_path.clone())
                    .collect();
                if pending.is_empty() {
                    Ok(())
                } else {
                    Err(Error::ManualRenamesPending { paths: pending })
                }
            }
            StepKind::RenameSupport => self.rename_support(),
            StepKind::SetupComponent => {
                let format = self.rewriter.infer_format(&self.layout)?;
                self.rewriter.scaffold_component_support(format)?;
                Ok(())
            }
            StepKind::ConfigFile => self.write_config(),
        }
    }

    fn rename_auto(&mut self) -> Result<()> {
        if self.mode != RenameMode::All {
            debug!("Rename mode {}, no spec files to rename", self.mode);
            return Ok(());
        }

        let renames: Vec<(PathBuf, PathBuf)> = self
            .classification
            .auto_specs()
            .filter_map(|s| s.candidate().map(|c| (s.old_path.clone(), c.to_path_buf())))
            .collect();
        for (old, new) in &renames {
            self.renamer.rename_spec(old, new)?;
        }
        info!("Renamed {} specs", renames.len());
        Ok(())
    }

    fn rename_support(&mut self) -> Result<()> {
        let Some(old) = self.layout.support_file.path().map(Path::to_path_buf) else {
            return Ok(());
        };
        let new = support_file_target(&old, DEFAULT_E2E_SUPPORT_STEM);
        self.renamer.rename_support_file(&old, &new)?;
        self.renamed_support_file = Some(new);
        Ok(())
    }

    fn write_config(&mut self) -> Result<()> {
        self.finalize_folder()?;
        let conventions = self.conventions();
        if conventions.deferred_specs {
            warn!(
                "{} deferred specs keep their legacy names, the new spec pattern still covers {}",
                self.deferred_specs().count(),
                self.layout.integration_folder.path.display()
            );
        }
        let config = self
            .rewriter
            .rewrite(&self.legacy, &self.layout, &conventions)?;
        self.rewriter.write(&config)?;
        self.written_config = Some(config);
        Ok(())
    }

    /// Rename the default integration folder once no rename step is left
    fn finalize_folder(&mut self) -> Result<()> {
        let rename_pending = self
            .plan
            .steps()
            .iter()
            .any(|s| s.kind().is_rename() && !s.status().is_resolved());
        if self.folder_renamed
            || rename_pending
            || self.mode == RenameMode::None
            || !self.layout.integration_folder.is_default
        {
            return Ok(());
        }

        let folder = self.layout.integration_folder.path.clone();
        let deferred = self
            .deferred_specs()
            .filter(|s| s.old_path.starts_with(&folder))
            .count();
        if deferred > 0 {
            warn!(
                "Keeping {} in place, {} deferred specs are still inside",
                folder.display(),
                deferred
            );
            return Ok(());
        }

        if self.fs.is_dir(&folder)? {
            self.renamer
                .rename_folder(&folder, Path::new(DEFAULT_E2E_FOLDER))?;
        }
        self.folder_renamed = true;
        Ok(())
    }

    /// e2e specs still waiting for a manual rename
    fn deferred_specs(&self) -> impl Iterator<Item = &SpecFile> {
        self.classification.e2e_specs.iter().filter(|s| s.is_manual())
    }

    fn conventions(&self) -> MigratedConventions {
        let moved_to_e2e = self
            .renamer
            .history()
            .iter()
            .any(|r| r.to.starts_with(DEFAULT_E2E_FOLDER));
        MigratedConventions {
            e2e_folder_renamed: self.folder_renamed,
            spec_names_normalized: self.layout.test_files.is_default
                && self.mode == RenameMode::All,
            renamed_support_file: self.renamed_support_file.clone(),
            deferred_specs: self.deferred_specs().next().is_some(),
            partially_moved: !self.folder_renamed && moved_to_e2e,
        }
    }

    /// Commit a step status. A rename step goes back to pending when the
    /// folder rename that follows it fails.
    fn resolve(&mut self, step: StepKind, status: StepStatus) -> Result<()> {
        if let Some(entry) = self.plan.get_mut(step) {
            entry.set_status(status);
        }
        if step.is_rename() {
            if let Err(e) = self.reclassify().and_then(|()| self.finalize_folder()) {
                warn!("Step {} failed: {}", step, e);
                if let Some(entry) = self.plan.get_mut(step) {
                    entry.set_status(StepStatus::Pending);
                }
                return Err(e);
            }
        }
        debug!("Step {} {:?}, progress {:?}", step, status, self.progress());
        Ok(())
    }

    fn reclassify(&mut self) -> Result<()> {
        self.classification = self.classifier.classify_for(&self.layout, self.mode)?;
        self.replan();
        Ok(())
    }

    /// Derive the plan again, keeping every resolved step and every step
    /// that already moved files as it is
    fn replan(&mut self) {
        if self.config_step_resolved() {
            return;
        }

        let fresh = MigrationPlanner::plan(&self.layout, &self.classification, self.mode);
        let kept: Vec<MigrationStep> = self
            .plan
            .steps()
            .iter()
            .filter(|s| s.status().is_resolved() || self.touched.contains(&s.kind()))
            .cloned()
            .collect();
        let kept_kinds: HashSet<StepKind> = kept.iter().map(MigrationStep::kind).collect();

        let mut steps: Vec<MigrationStep> = fresh
            .steps()
            .iter()
            .filter(|s| !kept_kinds.contains(&s.kind()))
            .cloned()
            .collect();
        steps.extend(kept);
        self.plan = MigrationPlan::from_steps(steps);
        debug!("Plan derived again: {:?}", self.plan.kinds());
    }

    fn config_step_resolved(&self) -> bool {
        self.plan
            .get(StepKind::ConfigFile)
            .is_some_and(|s| s.status().is_resolved())
    }
}
