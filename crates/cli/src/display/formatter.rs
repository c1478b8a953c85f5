use specmigrate_core::{
    Classification, Disposition, LegacyLayout, MigrationPlan, MigrationStep, SpecFile, StepKind,
    StepStatus, SupportFile,
};

/// Human readable title of a step
pub fn step_title(kind: StepKind) -> &'static str {
    match kind {
        StepKind::RenameAuto => "Rename existing specs automatically",
        StepKind::RenameManual => "Rename the remaining specs by hand",
        StepKind::RenameSupport => "Rename the support file",
        StepKind::SetupComponent => "Set up component testing",
        StepKind::ConfigFile => "Write the new config file",
    }
}

pub fn print_layout(layout: &LegacyLayout) {
    println!("📁 Layout:");
    println!(
        "   • integrationFolder: {}{}",
        layout.integration_folder.path.display(),
        default_marker(layout.integration_folder.is_default)
    );
    println!(
        "   • testFiles: {}{}",
        layout.test_files.pattern,
        default_marker(layout.test_files.is_default)
    );
    match &layout.component_folder {
        Some(folder) => println!(
            "   • componentFolder: {}{}",
            folder.path.display(),
            default_marker(folder.is_default)
        ),
        None => println!("   • componentFolder: none (component testing unused)"),
    }
    match &layout.support_file {
        SupportFile::Path(path) => println!("   • supportFile: {}", path.display()),
        SupportFile::Disabled => println!("   • supportFile: false"),
    }
    if let Some(plugins) = &layout.plugins_file {
        println!("   • pluginsFile: {}", plugins.display());
    }
}

pub fn print_classification(classification: &Classification) {
    println!("\n🧪 Specs:");
    if classification.all().next().is_none() {
        println!("   (no specs found)");
        return;
    }
    for spec in classification.all() {
        print_spec(spec);
    }
}

pub fn print_spec(spec: &SpecFile) {
    match &spec.disposition {
        Disposition::Auto { new_path } => println!(
            "   🔁 [{}] {} → {}",
            spec.kind,
            spec.old_path.display(),
            new_path.display()
        ),
        Disposition::Manual { reason, candidate } => {
            print!("   ✋ [{}] {} ({})", spec.kind, spec.old_path.display(), reason);
            if let Some(candidate) = candidate {
                print!(", suggested {}", candidate.display());
            }
            println!();
        }
        Disposition::Keep => {
            println!("   📌 [{}] {} (kept)", spec.kind, spec.old_path.display())
        }
    }
}

pub fn print_plan(plan: &MigrationPlan, current: Option<StepKind>) {
    println!("\n📋 Steps:");
    for (index, step) in plan.steps().iter().enumerate() {
        let kind = step.kind();
        let icon = match step.status() {
            StepStatus::Completed => "✅",
            StepStatus::Skipped => "⏭️ ",
            StepStatus::Pending if Some(kind) == current => "▶️ ",
            StepStatus::Pending => "⏳",
        };
        print!("   {icon} {}. {}", index + 1, step_title(kind));
        if let MigrationStep::RenameAuto { mode, .. } = step {
            print!(" (rename: {mode})");
        }
        println!();
    }
}

fn default_marker(is_default: bool) -> &'static str {
    if is_default { " (default)" } else { "" }
}
