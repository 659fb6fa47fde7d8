//! Integration test suite for plugin-checks
//!
//! End-to-end tests that run the `plugin-checks` binary against throwaway
//! workspaces built with [`TestWorkspace`](plugin_checks::test_utils::TestWorkspace).
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **check**: the `check` command, text and JSON reports, exit codes
//! - **config**: `plugin-checks.toml`, `--config` and flag overrides
//! - **modules**: implementation resolution across module formats
//! - **projects**: the `projects` command
//! - **rules**: the `rules` command

use assert_cmd::Command;
use plugin_checks::test_utils::TestWorkspace;

mod check;
mod config;
mod modules;
mod projects;
mod rules;

/// The binary, isolated from the caller's environment and run inside `ws`.
pub fn checks_cmd(ws: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("plugin-checks").unwrap();
    cmd.current_dir(ws.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("PLUGIN_CHECKS_CONFIG");
    cmd
}

/// A workspace with one valid plugin project at `libs/my-plugin`.
pub fn valid_plugin() -> TestWorkspace {
    TestWorkspace::builder()
        .unwrap()
        .with_project("my-plugin", "libs/my-plugin")
        .with_file("libs/my-plugin/src/generators/app/schema.json", r#"{"type": "object"}"#)
        .with_file(
            "libs/my-plugin/src/generators/app/generator.js",
            "\"use strict\";\nObject.defineProperty(exports, \"__esModule\", { value: true });\n\
             exports.appGenerator = appGenerator;\nasync function appGenerator(tree, options) {}\n\
             exports.default = appGenerator;\n",
        )
        .with_file("libs/my-plugin/src/executors/build/schema.json", "{}")
        .with_file(
            "libs/my-plugin/src/executors/build/executor.js",
            "module.exports = async function runExecutor(options, context) {\n  return { success: true };\n};\n",
        )
        .with_file(
            "libs/my-plugin/src/migrations/update-1/update.js",
            "export default function update(tree) {}\n",
        )
        .with_file(
            "libs/my-plugin/generators.json",
            r#"{
  "generators": {
    "app": {
      "factory": "./src/generators/app/generator#appGenerator",
      "schema": "./src/generators/app/schema.json",
      "description": "Creates an app"
    }
  }
}"#,
        )
        .with_file(
            "libs/my-plugin/executors.json",
            r#"{
  "executors": {
    "build": {
      "implementation": "./src/executors/build/executor",
      "schema": "./src/executors/build/schema.json"
    }
  }
}"#,
        )
        .with_file(
            "libs/my-plugin/migrations.json",
            r#"{
  "generators": {
    "update-1": {
      "version": "1.2.0",
      "implementation": "./src/migrations/update-1/update#default"
    }
  }
}"#,
        )
        .with_file(
            "libs/my-plugin/package.json",
            r#"{
  "name": "@acme/my-plugin",
  "nx-migrations": {
    "migrations": "./migrations.json",
    "packageGroup": [{ "package": "@acme/core", "version": "latest" }]
  }
}"#,
        )
        .build()
        .unwrap()
}
