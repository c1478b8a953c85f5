use std::io;
use std::path::PathBuf;

use crate::types::StepKind;

/// Errors that can occur while planning or applying a migration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read config {path}: {reason}")]
    ConfigReadError { path: PathBuf, reason: String },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    PatternError { pattern: String, reason: String },

    #[error("Cannot rename {from} to {to}: target already exists")]
    CollisionError { from: PathBuf, to: PathBuf },

    #[error("Cannot rename {path}: source file is missing")]
    NotFoundError { path: PathBuf },

    #[error("Config file {path} already exists and was not created by this migration")]
    ConfigAlreadyExistsError { path: PathBuf },

    #[error("IO error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Step {step} cannot be resolved now: {reason}")]
    InvalidTransition { step: StepKind, reason: String },

    #[error("Step {0} cannot be skipped")]
    SkipNotAllowed(StepKind),

    #[error("Step {0} has no decision to change")]
    DecisionNotApplicable(StepKind),

    #[error("Specs still need a manual rename: {}", display_paths(.paths))]
    ManualRenamesPending { paths: Vec<PathBuf> },

    #[error("The migration wizard has been closed")]
    WizardClosed,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn config_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::ConfigReadError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Fatal errors abort the migration before any plan exists.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigReadError { .. } | Error::PatternError { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for specmigrate operations
pub type Result<T> = std::result::Result<T, Error>;
