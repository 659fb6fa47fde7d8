//! Tests for the `projects` command.

use predicates::prelude::*;
use serde_json::Value;

use super::{checks_cmd, valid_plugin};
use plugin_checks::test_utils::TestWorkspace;

#[test]
fn test_projects_lists_manifests() {
    let ws = valid_plugin();

    checks_cmd(&ws)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("my-plugin (libs/my-plugin)"))
        .stdout(predicate::str::contains("  generators.json"))
        .stdout(predicate::str::contains("  package.json"));
}

#[test]
fn test_projects_json_and_workspace_json() {
    let ws = TestWorkspace::builder()
        .unwrap()
        .with_file("workspace.json", r#"{"version": 2, "projects": {"legacy": "libs/legacy"}}"#)
        .with_file("libs/legacy/executors.json", r#"{"executors": {}}"#)
        .build()
        .unwrap();

    let output = checks_cmd(&ws).args(["projects", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let projects: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(projects[0]["name"], "legacy");
    assert_eq!(projects[0]["root"], "libs/legacy");
    assert_eq!(projects[0]["manifests"][0], "executors.json");
}

#[test]
fn test_projects_excluded_directories() {
    let ws = valid_plugin();
    ws.write_file("plugin-checks.toml", "exclude = [\"libs/**\"]\n").unwrap();

    checks_cmd(&ws)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found"));
}
