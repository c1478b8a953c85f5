use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project(config: &str, files: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("cypress.json"), config).unwrap();
    for file in files {
        let path = temp_dir.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
    temp_dir
}

fn specmigrate(cwd: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("specmigrate").unwrap();
    cmd.args(args).arg("--cwd").arg(cwd);
    cmd
}

#[test]
fn test_plan_json_does_not_touch_the_project() {
    let temp_dir = project("{}", &["cypress/integration/a.spec.js"]);

    specmigrate(temp_dir.path(), &["plan", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"step\": \"renameAuto\""))
        .stdout(predicate::str::contains("cypress/e2e/a.cy.js"));

    assert!(temp_dir.path().join("cypress/integration/a.spec.js").exists());
    assert!(temp_dir.path().join("cypress.json").exists());
}

#[test]
fn test_plan_lists_steps() {
    let temp_dir = project("{}", &["cypress/integration/a.spec.js", "cypress/support/index.js"]);

    specmigrate(temp_dir.path(), &["plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rename existing specs automatically"))
        .stdout(predicate::str::contains("Rename the support file"))
        .stdout(predicate::str::contains("Write the new config file"));
}

#[test]
fn test_migrate_runs_every_step() {
    let temp_dir = project("{}", &["cypress/integration/a.spec.js"]);

    specmigrate(temp_dir.path(), &["migrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Migration complete"));

    let root = temp_dir.path();
    assert!(root.join("cypress/e2e/a.cy.js").exists());
    assert!(root.join("cypress.config.js").exists());
    assert!(!root.join("cypress.json").exists());
}

#[test]
fn test_migrate_stops_on_manual_renames() {
    let files = ["cypress/integration/a.spec.js", "cypress/integration/a_spec.js"];
    let temp_dir = project("{}", &files);

    specmigrate(temp_dir.path(), &["migrate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("manual rename"));
    assert!(temp_dir.path().join("cypress.json").exists());

    specmigrate(temp_dir.path(), &["migrate", "--skip-manual"])
        .assert()
        .success();
    let root = temp_dir.path();
    assert!(root.join("cypress/integration/a_spec.js").exists());
    let config = fs::read_to_string(root.join("cypress.config.js")).unwrap();
    assert!(config.contains("cypress/integration/**/*.*"));
}

#[test]
fn test_migrate_keep_everything() {
    let temp_dir = project("{}", &["cypress/integration/a.spec.js"]);

    specmigrate(temp_dir.path(), &["migrate", "--rename", "none"])
        .assert()
        .success();

    let root = temp_dir.path();
    assert!(root.join("cypress/integration/a.spec.js").exists());
    let config = fs::read_to_string(root.join("cypress.config.js")).unwrap();
    assert!(config.contains("cypress/integration/**/*.*"));
}

#[test]
fn test_interactive_quit_keeps_progress() {
    let temp_dir = project("{}", &["cypress/integration/a.spec.js"]);

    specmigrate(temp_dir.path(), &["migrate", "--interactive"])
        .write_stdin("proceed\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Migration paused after 1 of 2 steps"));

    assert!(temp_dir.path().join("cypress/e2e/a.cy.js").exists());
    assert!(temp_dir.path().join("cypress.json").exists());
}

#[test]
fn test_missing_config_fails() {
    let temp_dir = TempDir::new().unwrap();

    specmigrate(temp_dir.path(), &["plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_init_writes_settings_once() {
    let temp_dir = TempDir::new().unwrap();

    specmigrate(temp_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created settings"));
    let settings = fs::read_to_string(temp_dir.path().join(".specmigrate.json")).unwrap();
    assert!(settings.contains("\"legacy_config_file\": \"cypress.json\""));

    specmigrate(temp_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exist"));
}
