//! Arguments of the `check` command.

use clap::Args;
use std::path::PathBuf;

use crate::config::RuleOptions;

/// Validate plugin manifests of the workspace.
#[derive(Args, Debug, Default)]
pub struct CheckCommand {
    /// Files to check (defaults to every manifest of every project)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Generators manifest name relative to each project ("" disables)
    #[arg(long, value_name = "PATH")]
    pub generators_json: Option<String>,

    /// Executors manifest name relative to each project ("" disables)
    #[arg(long, value_name = "PATH")]
    pub executors_json: Option<String>,

    /// Migrations manifest name relative to each project ("" disables)
    #[arg(long, value_name = "PATH")]
    pub migrations_json: Option<String>,

    /// Package manifest name relative to each project ("" disables)
    #[arg(long, value_name = "PATH")]
    pub package_json: Option<String>,

    /// Non-semver version string to accept; repeat for several. Replaces the
    /// configured list.
    #[arg(long = "allow-version", value_name = "TOKEN")]
    pub allow_version: Vec<String>,

    /// TypeScript config registered for module resolution, relative to the
    /// workspace root
    #[arg(long, value_name = "PATH")]
    pub tsconfig: Option<String>,
}

impl CheckCommand {
    /// Rule options given on the command line.
    #[must_use]
    pub fn rule_overrides(&self) -> RuleOptions {
        RuleOptions {
            generators_json: self.generators_json.clone(),
            executors_json: self.executors_json.clone(),
            migrations_json: self.migrations_json.clone(),
            package_json: self.package_json.clone(),
            allowed_version_strings: if self.allow_version.is_empty() {
                None
            } else {
                Some(self.allow_version.clone())
            },
        }
    }
}

/// How results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Grouped, colored report for humans
    #[default]
    Text,

    /// One JSON document on stdout
    Json,
}
