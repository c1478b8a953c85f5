//! Complete wizard sessions against real project directories

use serde_json::json;
use specmigrate_core::{Error, RenameMode, Settings, StepKind, StepStatus, WizardState};
use specmigrate_suite::FixtureProject;
use std::path::Path;

#[test]
fn test_full_migration_of_a_default_project() {
    let project = FixtureProject::with_legacy_config(json!({
        "baseUrl": "http://localhost:3000",
        "viewportWidth": 1000,
        "component": { "viewportWidth": 500 }
    }))
    .with_files(&[
        "cypress/integration/login.spec.js",
        "cypress/integration/admin/users_spec.ts",
        "cypress/component/button.spec.tsx",
        "cypress/support/index.js",
        "cypress/plugins/index.js",
        "cypress/fixtures/user.json",
    ]);
    let mut wizard = project.wizard().unwrap();
    assert_eq!(
        wizard.get_plan().kinds(),
        vec![
            StepKind::RenameAuto,
            StepKind::RenameSupport,
            StepKind::SetupComponent,
            StepKind::ConfigFile
        ]
    );

    while let Some(step) = wizard.current_step() {
        wizard.proceed(step).unwrap();
    }
    assert_eq!(wizard.state(), WizardState::Done);

    for renamed in [
        "cypress/e2e/login.cy.js",
        "cypress/e2e/admin/users.cy.ts",
        "cypress/component/button.cy.tsx",
        "cypress/support/e2e.js",
        "cypress/support/component.js",
        "cypress/fixtures/user.json",
        "cypress.config.js",
    ] {
        assert!(project.exists(renamed), "{renamed} should exist");
    }
    assert!(!project.exists("cypress/integration"));
    assert!(!project.exists("cypress.json"));

    let config = wizard.written_config().unwrap();
    assert_eq!(
        config.value,
        json!({
            "baseUrl": "http://localhost:3000",
            "viewportWidth": 1000,
            "e2e": {
                "specPattern": "cypress/e2e/**/*.cy.{js,jsx,ts,tsx,coffee}",
                "supportFile": "cypress/support/e2e.js",
                "excludeSpecPattern": "*.hot-update.js",
                "setupNodeEvents": "cypress/plugins/index.js"
            },
            "component": {
                "viewportWidth": 500,
                "specPattern": "cypress/component/**/*.cy.{js,jsx,ts,tsx,coffee}",
                "excludeSpecPattern": "*.hot-update.js"
            }
        })
    );
    assert_eq!(project.read("cypress.config.js"), config.content);
}

#[test]
fn test_typescript_project_gets_typescript_config() {
    let project = FixtureProject::with_legacy_config(json!({}))
        .with_files(&["tsconfig.json", "cypress/integration/a.spec.ts"]);
    let mut wizard = project.wizard().unwrap();

    while let Some(step) = wizard.current_step() {
        wizard.proceed(step).unwrap();
    }
    let content = project.read("cypress.config.ts");
    assert!(content.starts_with("import { defineConfig } from 'cypress'"));
}

#[test]
fn test_interrupted_rename_can_be_retried() {
    let project = FixtureProject::with_legacy_config(json!({})).with_files(&[
        "cypress/integration/a.spec.js",
        "cypress/integration/b.spec.js",
    ]);
    let mut wizard = project.wizard().unwrap();

    // someone takes b's target after planning
    project.write("cypress/e2e/b.cy.js", "theirs");
    let err = wizard.proceed(StepKind::RenameAuto).unwrap_err();
    assert!(matches!(err, Error::CollisionError { ref to, .. } if to == Path::new("cypress/e2e/b.cy.js")));
    assert!(project.exists("cypress/e2e/a.cy.js"));
    assert_eq!(project.read("cypress/e2e/b.cy.js"), "theirs");

    // b now needs a manual decision, a stays renamed and its step stays open
    assert_eq!(
        wizard.get_plan().kinds(),
        vec![StepKind::RenameAuto, StepKind::RenameManual, StepKind::ConfigFile]
    );
    assert_eq!(wizard.current_step(), Some(StepKind::RenameAuto));
    assert_eq!(wizard.progress(), (0, 3));

    wizard
        .resolve_manual(
            Path::new("cypress/integration/b.spec.js"),
            Path::new("cypress/e2e/b-old.cy.js"),
        )
        .unwrap();
    assert_eq!(
        wizard.get_plan().kinds(),
        vec![StepKind::RenameAuto, StepKind::ConfigFile]
    );
    wizard.proceed(StepKind::RenameAuto).unwrap();
    assert_eq!(wizard.current_step(), Some(StepKind::ConfigFile));
    wizard.proceed(StepKind::ConfigFile).unwrap();
    assert!(!project.exists("cypress/integration"));
    assert_eq!(wizard.progress(), (2, 2));
}

#[test]
fn test_rename_decision_is_fixed_once_files_moved() {
    let project = FixtureProject::with_legacy_config(json!({})).with_files(&[
        "cypress/integration/a.spec.js",
        "cypress/integration/a_spec.js",
    ]);
    let mut wizard = project.wizard().unwrap();

    wizard
        .resolve_manual(
            Path::new("cypress/integration/a.spec.js"),
            Path::new("cypress/e2e/a.cy.js"),
        )
        .unwrap();
    assert!(matches!(
        wizard.change(StepKind::RenameAuto, RenameMode::None),
        Err(Error::DecisionNotApplicable(StepKind::RenameAuto))
    ));
    wizard
        .resolve_manual(
            Path::new("cypress/integration/a_spec.js"),
            Path::new("cypress/e2e/a-legacy.cy.js"),
        )
        .unwrap();

    while let Some(step) = wizard.current_step() {
        wizard.proceed(step).unwrap();
    }
    assert!(project.exists("cypress/e2e/a.cy.js"));
    assert!(project.exists("cypress/e2e/a-legacy.cy.js"));
    assert!(!project.exists("cypress/integration"));
    let config = wizard.written_config().unwrap();
    assert_eq!(
        config.value["e2e"]["specPattern"],
        "cypress/e2e/**/*.cy.{js,jsx,ts,tsx,coffee}"
    );
}

#[test]
fn test_keep_everything_writes_legacy_patterns() {
    let project = FixtureProject::with_legacy_config(json!({
        "integrationFolder": "tests/e2e",
        "supportFile": "tests/support.js"
    }))
    .with_files(&["tests/e2e/home.spec.js", "tests/support.js"]);
    let mut wizard = project.wizard().unwrap();

    wizard.change(StepKind::RenameAuto, RenameMode::None).unwrap();
    wizard.skip(StepKind::RenameAuto).unwrap();
    wizard.skip(StepKind::RenameSupport).unwrap();
    wizard.proceed(StepKind::ConfigFile).unwrap();

    assert!(project.exists("tests/e2e/home.spec.js"));
    assert!(project.exists("tests/support.js"));
    let config = wizard.written_config().unwrap();
    assert_eq!(config.value["e2e"]["specPattern"], "tests/e2e/**/*.*");
    assert_eq!(config.value["e2e"]["supportFile"], "tests/support.js");

    let statuses: Vec<StepStatus> = wizard.get_plan().steps().iter().map(|s| s.status()).collect();
    assert_eq!(
        statuses,
        vec![StepStatus::Skipped, StepStatus::Skipped, StepStatus::Completed]
    );
}

#[test]
fn test_support_rename_cannot_be_deferred_when_disabled() {
    let project = FixtureProject::with_legacy_config(json!({}))
        .with_files(&["cypress/support/index.js"]);
    let settings = Settings {
        allow_defer_support_rename: false,
        ..Settings::default()
    };
    let mut wizard = project.wizard_with(settings).unwrap();

    assert!(matches!(
        wizard.skip(StepKind::RenameSupport),
        Err(Error::SkipNotAllowed(StepKind::RenameSupport))
    ));
    assert!(matches!(
        wizard.skip(StepKind::ConfigFile),
        Err(Error::InvalidTransition { .. })
    ));
}

#[test]
fn test_sessions_are_independent() {
    let first = FixtureProject::with_legacy_config(json!({}))
        .with_files(&["cypress/integration/a.spec.js"]);
    let second = FixtureProject::with_legacy_config(json!({}))
        .with_files(&["cypress/integration/a.spec.js"]);

    let mut one = first.wizard().unwrap();
    let two = second.wizard().unwrap();
    one.proceed(StepKind::RenameAuto).unwrap();

    assert_eq!(one.progress(), (1, 2));
    assert_eq!(two.progress(), (0, 2));
    assert!(second.exists("cypress/integration/a.spec.js"));
}
