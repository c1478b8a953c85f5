//! Service implementations of the collaborator interfaces
//!
//! Concrete `std::fs` backed implementations used by the CLI and the tests.

pub mod project_config_store;
pub mod std_file_system;

pub use project_config_store::ProjectConfigStore;
pub use std_file_system::StdFileSystem;
