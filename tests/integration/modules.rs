//! Tests for implementation resolution across module formats.

use predicates::prelude::*;
use serde_json::Value;

use super::checks_cmd;
use plugin_checks::test_utils::{TestWorkspace, TestWorkspaceBuilder};

fn generator_plugin(implementation: &str) -> TestWorkspaceBuilder {
    TestWorkspace::builder()
        .unwrap()
        .with_project("tools", "tools/plugin")
        .with_file("tools/plugin/schema.json", "{}")
        .with_file(
            "tools/plugin/generators.json",
            format!(
                r#"{{"generators": {{"gen": {{"schema": "./schema.json", "implementation": "{implementation}"}}}}}}"#
            ),
        )
}

fn message_ids(ws: &TestWorkspace) -> Vec<String> {
    let output = checks_cmd(ws).args(["check", "--format", "json"]).output().unwrap();
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    report["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["messageId"].as_str().unwrap().to_string())
        .collect()
}

/// TypeScript sources resolve without a compiled build.
#[test]
fn test_typescript_implementation() {
    let ws = generator_plugin("./src/generator#default")
        .with_file(
            "tools/plugin/src/generator.ts",
            "import { Tree } from '@nx/devkit';\n\nexport default async function (tree: Tree) {}\n",
        )
        .build()
        .unwrap();

    assert!(message_ids(&ws).is_empty());
}

/// Directory implementations resolve through their index file.
#[test]
fn test_directory_index_implementation() {
    let ws = generator_plugin("./src/gen#gen")
        .with_file("tools/plugin/src/gen/index.ts", "export * from './gen';\n")
        .with_file("tools/plugin/src/gen/gen.ts", "export const gen = (tree) => {};\n")
        .build()
        .unwrap();

    assert!(message_ids(&ws).is_empty());
}

/// Re-exports are followed through package main and tsconfig path aliases.
#[test]
fn test_reexports_through_packages_and_aliases() {
    let ws = generator_plugin("./src/generator#gen")
        .with_file(
            "tsconfig.base.json",
            r#"{"compilerOptions": {"baseUrl": ".", "paths": {"@acme/utils": ["libs/utils/src/index.ts"]}}}"#,
        )
        .with_file("libs/utils/src/index.ts", "export function build() {}\n")
        .with_file("node_modules/acme-gen/package.json", r#"{"name": "acme-gen", "main": "lib/main.js"}"#)
        .with_file("node_modules/acme-gen/lib/main.js", "exports.gen = function gen() {};\n")
        .with_file(
            "tools/plugin/src/generator.ts",
            "export { gen } from 'acme-gen';\nexport { build as other } from '@acme/utils';\n",
        )
        .build()
        .unwrap();

    assert!(message_ids(&ws).is_empty());

    ws.write_file(
        "tools/plugin/generators.json",
        r#"{"generators": {"gen": {"schema": "./schema.json", "implementation": "./src/generator#other"}}}"#,
    )
    .unwrap();
    assert!(message_ids(&ws).is_empty());
}

/// A value export is not an implementation.
#[test]
fn test_non_callable_export() {
    let ws = generator_plugin("./src/generator.js#gen")
        .with_file("tools/plugin/src/generator.js", "module.exports = { gen: { name: 'gen' } };\n")
        .build()
        .unwrap();

    assert_eq!(message_ids(&ws), vec!["invalidImplementationModule"]);
}

/// A relative re-export that does not exist makes the module unreadable.
#[test]
fn test_broken_relative_reexport() {
    let ws = generator_plugin("./src/generator#gen")
        .with_file("tools/plugin/src/generator.ts", "export * from './moved-away';\n")
        .build()
        .unwrap();

    checks_cmd(&ws)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("gen: Unable to read exports for implementation module"));
}

/// A path that resolves nowhere skips the export check.
#[test]
fn test_unresolvable_implementation() {
    let ws = generator_plugin("./src/nothing#gen").build().unwrap();

    assert_eq!(message_ids(&ws), vec!["invalidImplementationPath"]);
}

/// JSON modules expose their top-level keys as values.
#[test]
fn test_json_module_exports_are_values() {
    let ws = generator_plugin("./data.json#gen")
        .with_file("tools/plugin/data.json", r#"{"gen": "not a function"}"#)
        .build()
        .unwrap();

    assert_eq!(message_ids(&ws), vec!["invalidImplementationModule"]);
}
