use anyhow::Result;
use clap::{Parser, Subcommand};
use specmigrate_core::RenameMode;

use crate::commands::{MigrateOptions, init_command, migrate_command, plan_command};

#[derive(Parser, Debug)]
#[command(name = "specmigrate")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the migration plan without changing anything
    #[command(visible_alias = "p")]
    Plan {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        cwd: Option<String>,

        /// Print the layout, classification and plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Migrate the project step by step
    #[command(visible_alias = "m")]
    Migrate {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        cwd: Option<String>,

        /// What to rename: all, folder-only or none
        #[arg(short, long, default_value = "all")]
        rename: RenameMode,

        /// Defer specs that need a manual rename
        #[arg(long)]
        skip_manual: bool,

        /// Keep the support file where it is
        #[arg(long)]
        skip_support: bool,

        /// Confirm every step on stdin and watch the project for moves
        #[arg(short, long)]
        interactive: bool,
    },
    /// Write a default .specmigrate.json
    Init {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        cwd: Option<String>,

        /// Force overwrite existing settings
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Plan { cwd, json } => plan_command(cwd.as_deref(), json),
            Commands::Migrate {
                cwd,
                rename,
                skip_manual,
                skip_support,
                interactive,
            } => migrate_command(
                cwd.as_deref(),
                MigrateOptions {
                    rename,
                    skip_manual,
                    skip_support,
                    interactive,
                },
            ),
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force),
        }
    }
}
