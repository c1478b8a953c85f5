pub mod layout;
pub mod spec_file;
pub mod step;

// Re-export commonly used types
pub use layout::{FolderSetting, GlobSetting, LegacyLayout, SupportFile};
pub use spec_file::{Classification, Disposition, ManualReason, SpecFile, SpecKind};
pub use step::{MigrationPlan, MigrationStep, RenameMode, StepKind, StepStatus};
