pub mod init;
pub mod migrate;
pub mod plan;

pub use init::init_command;
pub use migrate::{MigrateOptions, migrate_command};
pub use plan::plan_command;
