use anyhow::{Context, Result};
use tracing::info;

use specmigrate_core::Settings;

use crate::utils::project_root;

pub fn init_command(cwd: Option<&str>, force: bool) -> Result<()> {
    let project_root = project_root(cwd)?;
    let settings_path = Settings::settings_path(&project_root);

    if settings_path.exists() && !force {
        println!("❌ Settings already exist at: {}", settings_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    Settings::default()
        .save_to_file(&settings_path)
        .with_context(|| format!("Failed to write settings to {}", settings_path.display()))?;
    info!("Wrote default settings");

    println!("✅ Created settings: {}", settings_path.display());
    println!("\n📌 Edit it to change:");
    println!("   • legacy_config_file          the legacy config to migrate");
    println!("   • allow_defer_manual_renames  whether manual renames may be skipped");
    println!("   • allow_defer_support_rename  whether the support file rename may be skipped");
    println!("   • ignore_dirs                 directories never searched for specs");
    Ok(())
}
