//! Tests for the `rules` command.

use predicates::prelude::*;
use serde_json::Value;

use super::checks_cmd;
use plugin_checks::test_utils::TestWorkspace;

#[test]
fn test_rules_text() {
    let ws = TestWorkspace::builder().unwrap().build().unwrap();

    checks_cmd(&ws)
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nx-plugin-checks\n"))
        .stdout(predicate::str::contains("valueShouldBeObject"))
        .stdout(predicate::str::contains("{{ key }}: Missing required property - `implementation`"));
}

/// The catalog needs no workspace.
#[test]
fn test_rules_json_outside_workspace() {
    let ws = TestWorkspace::builder().unwrap().without_nx_json().build().unwrap();

    let output = checks_cmd(&ws).args(["rules", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let catalog: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = catalog["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["messageId"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 11);
    assert!(ids.contains(&"unableToReadImplementationExports"));
}
