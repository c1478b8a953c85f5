//! File renames
//!
//! Every rename is a single move on the file system and is durable as soon
//! as it returns. Batches are not transactional; re-running a rename that
//! already happened is a no-op.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::interfaces::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RenameOutcome {
    Renamed,
    /// The source is gone and the target is in place
    AlreadyApplied,
}

/// A rename performed during this session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    pub from: PathBuf,
    pub to: PathBuf,
}

pub struct FileRenamer {
    fs: Arc<dyn FileSystem>,
    history: Vec<RenameRecord>,
}

impl FileRenamer {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            history: Vec::new(),
        }
    }

    /// Renames applied so far, in order
    pub fn history(&self) -> &[RenameRecord] {
        &self.history
    }

    pub fn rename_spec(&mut self, old: &Path, new: &Path) -> Result<RenameOutcome> {
        let outcome = self.move_file(old, new)?;
        if outcome == RenameOutcome::Renamed {
            info!("Renamed spec {} -> {}", old.display(), new.display());
        }
        Ok(outcome)
    }

    pub fn rename_support_file(&mut self, old: &Path, new: &Path) -> Result<RenameOutcome> {
        let outcome = self.move_file(old, new)?;
        if outcome == RenameOutcome::Renamed {
            info!("Renamed support file {} -> {}", old.display(), new.display());
        }
        Ok(outcome)
    }

    /// Move a whole folder. When `new` already exists the contents are
    /// merged into it; nothing moves if any file would be overwritten.
    pub fn rename_folder(&mut self, old: &Path, new: &Path) -> Result<RenameOutcome> {
        if !self.fs.is_dir(old)? {
            if self.fs.is_dir(new)? {
                debug!("Folder {} already renamed", old.display());
                return Ok(RenameOutcome::AlreadyApplied);
            }
            return Err(Error::NotFoundError {
                path: old.to_path_buf(),
            });
        }

        if !self.fs.exists(new)? {
            self.fs.move_path(old, new)?;
            self.record(old, new);
            info!("Renamed folder {} -> {}", old.display(), new.display());
            return Ok(RenameOutcome::Renamed);
        }

        let mut moves = Vec::new();
        for file in self.fs.list_files(old)? {
            let relative = file.strip_prefix(old).unwrap_or(&file);
            let target = new.join(relative);
            if self.fs.exists(&target)? {
                return Err(Error::CollisionError { from: file, to: target });
            }
            moves.push((file, target));
        }

        for (from, to) in &moves {
            self.fs.move_path(from, to)?;
            self.record(from, to);
        }
        if !self.fs.remove_empty_dirs(old)? {
            debug!("Left {} in place, it still holds files", old.display());
        }
        info!(
            "Merged folder {} into {} ({} files)",
            old.display(),
            new.display(),
            moves.len()
        );
        Ok(RenameOutcome::Renamed)
    }

    fn move_file(&mut self, old: &Path, new: &Path) -> Result<RenameOutcome> {
        if old == new {
            return Ok(RenameOutcome::AlreadyApplied);
        }

        let source_exists = self.fs.exists(old)?;
        let target_exists = self.fs.exists(new)?;
        match (source_exists, target_exists) {
            (true, true) => Err(Error::CollisionError {
                from: old.to_path_buf(),
                to: new.to_path_buf(),
            }),
            (true, false) => {
                self.fs.move_path(old, new)?;
                self.record(old, new);
                Ok(RenameOutcome::Renamed)
            }
            (false, true) => {
                debug!("{} already renamed to {}", old.display(), new.display());
                Ok(RenameOutcome::AlreadyApplied)
            }
            (false, false) => Err(Error::NotFoundError {
                path: old.to_path_buf(),
            }),
        }
    }

    fn record(&mut self, from: &Path, to: &Path) {
        self.history.push(RenameRecord {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }
}
