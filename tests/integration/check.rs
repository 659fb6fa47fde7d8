//! Tests for the `check` command.

use predicates::prelude::*;
use serde_json::Value;

use super::{checks_cmd, valid_plugin};
use plugin_checks::test_utils::TestWorkspace;

/// A valid plugin passes with a success summary.
#[test]
fn test_check_valid_plugin() {
    let ws = valid_plugin();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ No problems in 4 checked files"));
}

/// Running from a nested directory still finds the workspace root.
#[test]
fn test_check_from_subdirectory() {
    let ws = valid_plugin();

    checks_cmd(&ws)
        .current_dir(ws.join("libs/my-plugin/src"))
        .arg("check")
        .assert()
        .success();
}

/// Problems are grouped per file and the exit code is non-zero.
#[test]
fn test_check_reports_problems() {
    let ws = valid_plugin();
    ws.write_file(
        "libs/my-plugin/generators.json",
        r#"{
  "generators": {
    "app": {
      "factory": "./src/generators/app/generator#libraryGenerator",
      "schema": "./src/generators/app/missing.json"
    },
    "lib": "./src/generators/lib"
  }
}"#,
    )
    .unwrap();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("libs/my-plugin/generators.json"))
        .stdout(predicate::str::contains(
            "/generators/app/schema  Schema path should point to a valid file  nx-plugin-checks/invalidSchemaPath",
        ))
        .stdout(predicate::str::contains(
            "app: Unable to find export libraryGenerator in implementation module",
        ))
        .stdout(predicate::str::contains("lib should be an object"))
        .stdout(predicate::str::contains("✗ 3 problems in 1 of 4 checked files"))
        .stderr(predicate::str::contains("Found 3 problem(s) and 0 error(s)"));
}

/// The JSON report carries ids, pointers and substitutions.
#[test]
fn test_check_json_output() {
    let ws = valid_plugin();
    ws.write_file(
        "libs/my-plugin/migrations.json",
        r#"{"generators": {"update-1": {"version": "soon", "implementation": "./src/migrations/update-1/update"}}}"#,
    )
    .unwrap();

    let output = checks_cmd(&ws).args(["check", "--format", "json"]).output().unwrap();
    assert!(!output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["filesChecked"], 4);
    assert_eq!(report["errors"].as_array().unwrap().len(), 0);

    let diagnostics = report["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["file"], "libs/my-plugin/migrations.json");
    assert_eq!(diagnostics[0]["rule"], "nx-plugin-checks");
    assert_eq!(diagnostics[0]["messageId"], "invalidVersion");
    assert_eq!(diagnostics[0]["location"], "/generators/update-1/version");
    assert_eq!(diagnostics[0]["data"]["key"], "update-1");
}

/// Missing roots are reported once, at the document root.
#[test]
fn test_check_missing_collection_roots() {
    let ws = valid_plugin();
    ws.write_file("libs/my-plugin/executors.json", r#"{"generators": {}}"#).unwrap();

    checks_cmd(&ws)
        .args(["check", "libs/my-plugin/executors.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "  /  Unable to find `executors` or `builders` property  nx-plugin-checks/noExecutorsOrBuildersFound",
        ));
}

/// Named files that are not manifests are counted as skipped.
#[test]
fn test_check_named_non_manifest_is_skipped() {
    let ws = valid_plugin();

    checks_cmd(&ws)
        .args(["check", "libs/my-plugin/src/generators/app/schema.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems in 0 checked files"));
}

/// Invalid JSON in a manifest is a per-file error, other files still run.
#[test]
fn test_check_invalid_json_manifest() {
    let ws = valid_plugin();
    ws.write_file("libs/my-plugin/executors.json", "{ \"executors\": ").unwrap();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ libs/my-plugin/executors.json"))
        .stdout(predicate::str::contains("1 file could not be checked"))
        .stdout(predicate::str::contains("0 problems").not());
}

/// Manifests and schemas may carry comments and trailing commas.
#[test]
fn test_check_commented_manifest_and_schema() {
    let ws = valid_plugin();
    ws.write_file(
        "libs/my-plugin/src/generators/app/schema.json",
        "{\n  // options of the app generator\n  \"type\": \"object\",\n}\n",
    )
    .unwrap();
    ws.write_file(
        "libs/my-plugin/generators.json",
        r#"{
  /* generators shipped by this plugin */
  "generators": {
    "app": {
      "factory": "./src/generators/app/generator#appGenerator", // entry point
      "schema": "./src/generators/app/schema.json",
    },
  },
}
"#,
    )
    .unwrap();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ No problems in 4 checked files"));
}

/// A line-minified CommonJS build of a generator is accepted.
#[test]
fn test_check_minified_commonjs_implementation() {
    let ws = valid_plugin();
    ws.write_file(
        "libs/my-plugin/src/generators/app/generator.js",
        r#""use strict";Object.defineProperty(exports,"__esModule",{value:!0});exports.appGenerator=void 0;async function appGenerator(t,o){}exports.appGenerator=appGenerator;"#,
    )
    .unwrap();

    checks_cmd(&ws).arg("check").assert().success();
}

/// Package groups are validated in both the array and the object form.
#[test]
fn test_check_package_group_forms() {
    let ws = TestWorkspace::builder()
        .unwrap()
        .with_project("a", "libs/a")
        .with_project("b", "libs/b")
        .with_file(
            "libs/a/package.json",
            r#"{"ng-update": {"packageGroup": [{"package": "@acme/x"}, {"version": "banana"}]}}"#,
        )
        .with_file(
            "libs/b/package.json",
            r#"{"nx-migrations": {"packageGroup": {"@acme/y": "2.0.0", "@acme/z": "^2.0.0"}}}"#,
        )
        .build()
        .unwrap();

    let output = checks_cmd(&ws).args(["check", "--format", "json"]).output().unwrap();
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let found: Vec<(String, String)> = report["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| (d["messageId"].as_str().unwrap().to_string(), d["data"]["key"].as_str().unwrap().to_string()))
        .collect();

    assert_eq!(
        found,
        vec![
            ("missingVersion".to_string(), "@acme/x".to_string()),
            ("invalidVersion".to_string(), "unknown".to_string()),
            ("invalidVersion".to_string(), "@acme/z".to_string()),
        ]
    );
}

/// Outside any workspace the command fails with a suggestion.
#[test]
fn test_check_outside_workspace() {
    let ws = TestWorkspace::builder().unwrap().without_nx_json().build().unwrap();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--workspace-root"));
}
