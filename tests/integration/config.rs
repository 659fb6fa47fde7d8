//! Tests for configuration files and option flags.

use predicates::prelude::*;

use super::{checks_cmd, valid_plugin};

/// Manifest names from plugin-checks.toml are honoured.
#[test]
fn test_config_file_renames_manifests() {
    let ws = valid_plugin();
    ws.write_file("plugin-checks.toml", "generatorsJson = \"collection.json\"\n").unwrap();
    ws.write_file("libs/my-plugin/collection.json", r#"{"schematics": {"x": {}}}"#).unwrap();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("libs/my-plugin/collection.json"))
        .stdout(predicate::str::contains("x: Missing required property - `schema`"))
        .stdout(predicate::str::contains("libs/my-plugin/generators.json").not());
}

/// An empty name disables a manifest kind.
#[test]
fn test_flag_disables_manifest_kind() {
    let ws = valid_plugin();
    ws.write_file("libs/my-plugin/migrations.json", r#"{"oops": true}"#).unwrap();

    checks_cmd(&ws).arg("check").assert().failure();
    checks_cmd(&ws)
        .args(["check", "--migrations-json", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems in 3 checked files"));
}

/// `--allow-version` replaces the accepted non-semver strings.
#[test]
fn test_allow_version_flag() {
    let ws = valid_plugin();
    ws.write_file(
        "libs/my-plugin/migrations.json",
        r#"{"generators": {"update-1": {"version": "canary", "implementation": "./src/migrations/update-1/update"}}}"#,
    )
    .unwrap();

    checks_cmd(&ws).arg("check").assert().failure();
    // "latest" in package.json is no longer accepted once the list is replaced.
    checks_cmd(&ws)
        .args(["check", "--allow-version", "canary"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("@acme/core: Version should be a valid semver"))
        .stdout(predicate::str::contains("update-1").not());
    checks_cmd(&ws)
        .args(["check", "--allow-version", "canary", "--allow-version", "latest"])
        .assert()
        .success();
}

/// Configured allow-lists apply too.
#[test]
fn test_config_allowed_version_strings() {
    let ws = valid_plugin();
    ws.write_file("plugin-checks.toml", "allowedVersionStrings = []\n").unwrap();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("nx-plugin-checks/invalidVersion"));
}

/// An explicit config file must exist.
#[test]
fn test_missing_explicit_config_fails() {
    let ws = valid_plugin();

    checks_cmd(&ws)
        .args(["--config", "nope.toml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

/// The environment variable names the config file.
#[test]
fn test_config_from_environment() {
    let ws = valid_plugin();
    let config = ws.write_file("configs/checks.toml", "executorsJson = \"\"\n").unwrap();
    ws.write_file("libs/my-plugin/executors.json", "[]").unwrap();

    checks_cmd(&ws)
        .env("PLUGIN_CHECKS_CONFIG", &config)
        .args(["check", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"filesChecked\": 3"));
}

/// Invalid TOML is reported as a configuration error.
#[test]
fn test_invalid_config_file() {
    let ws = valid_plugin();
    ws.write_file("plugin-checks.toml", "generatorsJson = [1, 2\n").unwrap();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("plugin-checks.toml"))
        .stderr(predicate::str::contains("allowedVersionStrings"));
}
