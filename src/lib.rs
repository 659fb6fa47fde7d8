//! plugin-checks - static validity checks for workspace plugin manifests
//!
//! Nx plugins describe their generators, executors and migrations in JSON
//! collection files, and may declare a `packageGroup` in `package.json`.
//! Mistakes in those files (a schema path that does not exist, an
//! implementation export that was renamed, a migration version that is not
//! semver) only show up when a user runs the plugin. plugin-checks finds them
//! ahead of time.
//!
//! # Architecture Overview
//!
//! - the workspace is scanned for projects; each visited file is matched
//!   against its owning project's manifest paths
//! - a matching manifest is parsed into a located JSON tree
//! - the rule walks the tree and reports diagnostics at the offending nodes
//! - implementation references are resolved like Node's `require` would and
//!   their exports are read statically, without running any JavaScript
//!
//! # Core Modules
//!
//! - [`cli`] - command line interface (`check`, `rules`, `projects`)
//! - [`config`] - `plugin-checks.toml` and rule options
//! - [`core`] - error types and user-facing error presentation
//! - [`json`] - JSON documents with JSON Pointer locations
//! - [`resolver`] - module resolution and static export inspection
//! - [`rules`] - the `nx-plugin-checks` rule and its diagnostics
//! - [`workspace`] - project discovery and manifest scope
//! - [`utils`] - path and file helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use plugin_checks::config::RuleOptions;
//! use plugin_checks::resolver::NodeModuleLoader;
//! use plugin_checks::rules::{Diagnostic, PluginChecks};
//! use plugin_checks::workspace::{ProjectGraph, ScopeResolver};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let root = Path::new("/work/my-repo");
//! let graph = ProjectGraph::discover(root, &[])?;
//! let scope = ScopeResolver::new(graph, RuleOptions::default());
//! let mut checks = PluginChecks::new(scope, root.join("tsconfig.base.json"), NodeModuleLoader::new()?);
//!
//! let file = root.join("libs/my-plugin/generators.json");
//! let text = std::fs::read_to_string(&file)?;
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! checks.check_source(&file, &text, &mut diagnostics)?;
//!
//! for diagnostic in &diagnostics {
//!     println!("{diagnostic}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod json;
pub mod resolver;
pub mod rules;
pub mod utils;
pub mod workspace;

// Test utilities (only compiled in test mode or with test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
