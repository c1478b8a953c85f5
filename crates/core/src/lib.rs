//! specmigrate - Plans and applies the migration of a legacy test-runner
//! project layout to the current conventions
//!
//! This crate provides functionality to:
//! - Read the legacy `.json` config and the project layout it describes
//! - Classify spec files as automatically or manually renameable
//! - Plan the migration steps and drive them through a step-by-step wizard
//! - Rename specs, folders and the support file, and write the new config
pub mod classifier;
pub mod config;
pub mod error;
pub mod interfaces;
pub mod planner;
pub mod renamer;
pub mod rewriter;
pub mod scanner;
pub mod services;
pub mod types;
pub mod wizard;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use classifier::SpecClassifier;
pub use config::{ConfigFormat, LegacyConfig, NewConfigFile, Settings};
pub use interfaces::{ConfigStore, FileSystem, StoredConfig};
pub use planner::MigrationPlanner;
pub use renamer::{FileRenamer, RenameOutcome, RenameRecord};
pub use rewriter::{ConfigRewriter, MigratedConventions};
pub use scanner::ProjectLayoutScanner;
pub use services::{ProjectConfigStore, StdFileSystem};
pub use wizard::{WizardController, WizardState};
