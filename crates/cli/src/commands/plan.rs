use anyhow::Result;
use serde_json::json;
use tracing::debug;

use crate::display::{print_classification, print_layout, print_plan};
use crate::utils::{open_wizard, project_root};

pub fn plan_command(cwd: Option<&str>, json: bool) -> Result<()> {
    let root = project_root(cwd)?;
    debug!("Planning migration for {}", root.display());
    let (_settings, wizard) = open_wizard(&root)?;

    if json {
        let report = json!({
            "layout": wizard.layout(),
            "classification": wizard.classification(),
            "plan": wizard.get_plan(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("🔍 Migration plan for: {}", root.display());
    println!("{}", "=".repeat(80));
    print_layout(wizard.layout());
    print_classification(wizard.classification());
    print_plan(wizard.get_plan(), wizard.current_step());
    Ok(())
}
