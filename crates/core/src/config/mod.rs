//! Configuration management for specmigrate
//!
//! Covers both sides of the migration (the legacy `.json` config and the
//! current script config) plus the tool's own settings.

pub mod legacy;
mod settings;
pub mod target;

// Re-export main types
pub use legacy::{Declared, LegacyConfig, TestingType};
pub use settings::{SETTINGS_FILE, Settings};
pub use target::{ConfigFormat, NewConfigFile};
