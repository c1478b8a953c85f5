//! Collaborator interfaces
//!
//! The planner and the wizard never touch `std::fs` directly. They go
//! through these traits so tests and hosts can supply their own
//! implementations.

pub mod config_store;
pub mod file_system;

pub use config_store::{ConfigStore, StoredConfig};
pub use file_system::FileSystem;
