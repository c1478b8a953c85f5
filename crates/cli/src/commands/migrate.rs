use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use specmigrate_core::{Error, RenameMode, StepKind, WizardController, WizardState};

use crate::display::{print_classification, print_plan, step_title};
use crate::utils::{open_wizard, project_root};
use crate::watcher::ProjectWatcher;

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrateOptions {
    pub rename: RenameMode,
    pub skip_manual: bool,
    pub skip_support: bool,
    pub interactive: bool,
}

pub fn migrate_command(cwd: Option<&str>, options: MigrateOptions) -> Result<()> {
    let root = project_root(cwd)?;
    let (_settings, mut wizard) = open_wizard(&root)?;
    println!("🚀 Migrating: {}", root.display());

    if options.rename != RenameMode::All {
        wizard.change(StepKind::RenameAuto, options.rename)?;
    }

    if options.interactive {
        let stdin = io::stdin();
        return run_interactive(&root, &mut wizard, stdin.lock());
    }
    run_batch(&mut wizard, options)
}

/// Resolve every step without asking
fn run_batch(wizard: &mut WizardController, options: MigrateOptions) -> Result<()> {
    while let Some(step) = wizard.current_step() {
        let skip = match step {
            StepKind::RenameAuto => wizard.rename_mode() == RenameMode::None,
            StepKind::RenameManual => options.skip_manual,
            StepKind::RenameSupport => options.skip_support,
            StepKind::SetupComponent | StepKind::ConfigFile => false,
        };

        let result = if skip { wizard.skip(step) } else { wizard.proceed(step) };
        match result {
            Ok(_) => report_step(step, skip),
            Err(e @ Error::ManualRenamesPending { .. }) => {
                print_classification(wizard.classification());
                bail!("{e}\n   Rename them yourself or pass --skip-manual to defer them");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Step '{}' failed", step_title(step)));
            }
        }
    }

    finish(wizard);
    Ok(())
}

/// Read commands from `input` until the wizard is done or the user quits
pub fn run_interactive(
    root: &Path,
    wizard: &mut WizardController,
    input: impl BufRead,
) -> Result<()> {
    let watcher = match ProjectWatcher::start(root) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("Continuing without watching the project: {e:#}");
            None
        }
    };

    print_plan(wizard.get_plan(), wizard.current_step());
    print_help();
    let mut lines = input.lines();

    loop {
        if let Some(watcher) = &watcher {
            for moved in watcher.drain() {
                if let Err(e) = wizard.file_moved(&moved.from, &moved.to) {
                    warn!("Could not refresh after {}: {}", moved.to.display(), e);
                }
            }
        }

        let Some(step) = wizard.current_step() else {
            finish(wizard);
            return Ok(());
        };
        print!("\n▶️  {} [proceed/skip/change/rename/plan/quit]: ", step_title(step));
        io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            debug!("Input closed");
            break;
        };
        let line = line.context("Failed to read command")?;
        let words: Vec<&str> = line.split_whitespace().collect();

        let result = match words.as_slice() {
            ["proceed" | "p"] | [] => wizard.proceed(step).map(|_| report_step(step, false)),
            ["skip" | "s"] => wizard.skip(step).map(|_| report_step(step, true)),
            ["change" | "c", mode] => match mode.parse::<RenameMode>() {
                Ok(mode) => wizard.change(StepKind::RenameAuto, mode).map(|state| {
                    println!("🔀 Rename decision is now '{mode}'");
                    print_plan(wizard.get_plan(), current(state));
                }),
                Err(e) => {
                    println!("❌ {e}");
                    continue;
                }
            },
            ["rename" | "r", old, new] => wizard
                .resolve_manual(Path::new(old), Path::new(new))
                .map(|_| println!("✅ Renamed {old} → {new}")),
            ["plan"] => {
                print_classification(wizard.classification());
                print_plan(wizard.get_plan(), wizard.current_step());
                continue;
            }
            ["quit" | "q"] => break,
            _ => {
                print_help();
                continue;
            }
        };

        if let Err(e) = result {
            if e.is_fatal() {
                return Err(e.into());
            }
            println!("❌ {e}");
            if let Error::ManualRenamesPending { paths } = &e {
                print_pending(paths);
            }
        }
    }

    wizard.close();
    let (resolved, total) = wizard.progress();
    println!("\n⏸️  Migration paused after {resolved} of {total} steps");
    println!("   Completed renames stay on disk; run migrate again to continue");
    Ok(())
}

fn current(state: WizardState) -> Option<StepKind> {
    match state {
        WizardState::Step(step) => Some(step),
        WizardState::Done => None,
    }
}

fn report_step(step: StepKind, skipped: bool) {
    if skipped {
        println!("⏭️  Skipped: {}", step_title(step));
    } else {
        println!("✅ {}", step_title(step));
    }
    info!("Resolved step {}", step);
}

fn print_pending(paths: &[PathBuf]) {
    println!("   Use 'rename <old> <new>' for each of:");
    for path in paths {
        println!("   • {}", path.display());
    }
}

fn print_help() {
    println!("\n📌 Commands:");
    println!("   proceed              run the current step");
    println!("   skip                 defer the current step, when allowed");
    println!("   change <mode>        rename all, folder-only or none");
    println!("   rename <old> <new>   rename a spec that needs a manual rename");
    println!("   plan                 show specs and steps again");
    println!("   quit                 stop here; finished steps stay applied");
}

fn finish(wizard: &WizardController) {
    let (resolved, total) = wizard.progress();
    println!("\n🎉 Migration complete ({resolved}/{total} steps)");
    if let Some(config) = wizard.written_config() {
        println!("   • Config: {}", config.path.display());
    }
    let renames = wizard.renames().len();
    if renames > 0 {
        println!("   • {} paths renamed", renames);
    }
}
