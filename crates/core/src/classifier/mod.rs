//! Spec classification
//!
//! Enumerates the specs of a legacy layout and decides, per spec, whether
//! it can be renamed automatically, needs the user, or can stay put.

pub mod naming;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::target::DEFAULT_E2E_FOLDER;
use crate::error::{Error, Result};
use crate::interfaces::FileSystem;
use crate::types::{
    Classification, Disposition, FolderSetting, LegacyLayout, ManualReason, RenameMode, SpecFile,
    SpecKind,
};

pub use naming::{candidate_path, normalize_spec_name, support_file_target};

/// A spec before collision detection
struct Draft {
    path: PathBuf,
    kind: SpecKind,
    candidate: Option<PathBuf>,
    ambiguous: bool,
}

pub struct SpecClassifier {
    fs: Arc<dyn FileSystem>,
}

impl SpecClassifier {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn classify(&self, layout: &LegacyLayout) -> Result<Classification> {
        self.classify_for(layout, RenameMode::All)
    }

    /// Classify against the targets of a rename decision. Folder-only
    /// candidates keep their file names, so only specs whose folder-level
    /// target is taken need the user.
    pub fn classify_for(&self, layout: &LegacyLayout, mode: RenameMode) -> Result<Classification> {
        let spec_glob = compile_glob(&layout.test_files.pattern)?;
        let ignored = compile_ignore(&layout.ignore_test_files)?;
        let matches_default = layout.test_files.is_default;
        let rename_files = matches_default && mode != RenameMode::FolderOnly;

        let component_dir = layout.component_folder.as_ref().map(|f| f.path.as_path());
        let e2e_files: Vec<PathBuf> = self
            .enumerate(&layout.integration_folder, &spec_glob, &ignored)?
            .into_iter()
            .filter(|p| component_dir.is_none_or(|c| c.as_os_str().is_empty() || !p.starts_with(c)))
            .collect();

        let mut drafts = Vec::new();
        for path in e2e_files {
            let candidate = (!layout.is_fully_custom_e2e()).then(|| {
                let new_folder = layout
                    .integration_folder
                    .is_default
                    .then(|| Path::new(DEFAULT_E2E_FOLDER));
                candidate_path(
                    &path,
                    &layout.integration_folder.path,
                    new_folder,
                    rename_files,
                )
            });
            drafts.push(Draft {
                path,
                kind: SpecKind::E2e,
                candidate,
                ambiguous: false,
            });
        }

        if let Some(folder) = &layout.component_folder {
            let ambiguous = !folder.is_default && !matches_default;
            for path in self.enumerate(folder, &spec_glob, &ignored)? {
                let candidate = (!ambiguous && rename_files)
                    .then(|| candidate_path(&path, &folder.path, None, true));
                drafts.push(Draft {
                    path,
                    kind: SpecKind::Component,
                    candidate,
                    ambiguous,
                });
            }
        }

        let mut targets: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
        for draft in &drafts {
            if let Some(candidate) = draft.candidate.as_ref().filter(|c| **c != draft.path) {
                targets
                    .entry(candidate.clone())
                    .or_default()
                    .push(draft.path.clone());
            }
        }

        let mut classification = Classification::default();
        for draft in drafts {
            let disposition = self.disposition(&draft, &targets)?;
            let spec = SpecFile::new(draft.path, draft.kind, matches_default, disposition);
            match spec.kind {
                SpecKind::E2e => classification.e2e_specs.push(spec),
                SpecKind::Component => classification.component_specs.push(spec),
            }
        }

        debug!(
            "Classified {} e2e and {} component specs ({} auto, {} manual)",
            classification.e2e_specs.len(),
            classification.component_specs.len(),
            classification.auto_specs().count(),
            classification.manual_specs().count()
        );
        Ok(classification)
    }

    fn disposition(
        &self,
        draft: &Draft,
        targets: &HashMap<PathBuf, Vec<PathBuf>>,
    ) -> Result<Disposition> {
        if draft.ambiguous {
            return Ok(Disposition::Manual {
                reason: ManualReason::AmbiguousPattern,
                candidate: None,
            });
        }
        let Some(candidate) = draft.candidate.clone() else {
            return Ok(Disposition::Keep);
        };
        if candidate == draft.path {
            return Ok(Disposition::Keep);
        }

        let colliding = targets
            .get(&candidate)
            .and_then(|sources| sources.iter().find(|s| **s != draft.path));
        if let Some(other) = colliding {
            return Ok(Disposition::Manual {
                reason: ManualReason::Collision {
                    with: other.clone(),
                },
                candidate: Some(candidate),
            });
        }

        if self.fs.exists(&candidate)? {
            return Ok(Disposition::Manual {
                reason: ManualReason::TargetExists,
                candidate: Some(candidate),
            });
        }

        Ok(Disposition::Auto {
            new_path: candidate,
        })
    }

    /// Files under `folder` whose folder-relative path matches the spec glob
    fn enumerate(
        &self,
        folder: &FolderSetting,
        spec_glob: &GlobMatcher,
        ignored: &GlobSet,
    ) -> Result<Vec<PathBuf>> {
        let files = self.fs.list_files(&folder.path)?;
        Ok(files
            .into_iter()
            .filter(|path| {
                let relative = path.strip_prefix(&folder.path).unwrap_or(path);
                let name = path.file_name().map(Path::new).unwrap_or(relative);
                spec_glob.is_match(relative)
                    && !ignored.is_match(relative)
                    && !ignored.is_match(name)
            })
            .collect())
    }
}

fn build_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map_err(|e| Error::PatternError {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    Ok(build_glob(pattern)?.compile_matcher())
}

fn compile_ignore(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(build_glob(pattern)?);
    }
    builder.build().map_err(|e| Error::PatternError {
        pattern: patterns.join(", "),
        reason: e.kind().to_string(),
    })
}
