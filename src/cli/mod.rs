//! Command-line interface for plugin-checks.
//!
//! # Available Commands
//!
//! - `check` - validate plugin manifests of the workspace (or given files)
//! - `rules` - print the diagnostic message catalog
//! - `projects` - list the projects discovered in the workspace
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging on stderr
//! - `--quiet` / `-q` - only errors are logged
//! - `--config` / `-c` - alternative `plugin-checks.toml`
//! - `--workspace-root` - skip workspace discovery and use this directory
//!
//! `RUST_LOG` overrides the level chosen by `--verbose` and `--quiet`.
//!
//! # Example
//!
//! ```bash
//! # Validate every manifest of every project
//! plugin-checks check
//!
//! # Validate two files, machine readable
//! plugin-checks check libs/a/generators.json libs/b/package.json --format json
//!
//! # Accept "canary" as a version in migrations and package groups
//! plugin-checks check --allow-version canary --allow-version latest
//! ```

pub mod check;
pub mod common;
pub mod projects;
pub mod rules;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings shared by every command, derived from the global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Configuration file named on the command line.
    pub config_path: Option<PathBuf>,

    /// Workspace root named on the command line.
    pub workspace_root: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            config_path: None,
            workspace_root: None,
        }
    }
}

impl CliConfig {
    /// Installs the stderr log subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("plugin_checks={}", self.log_level)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Static validity checks for Nx plugin manifests.
#[derive(Parser)]
#[command(
    name = "plugin-checks",
    about = "Validate generators, executors, migrations and package groups of workspace plugins",
    version,
    long_about = "plugin-checks finds the plugin manifests of every project in an Nx-style workspace \
                  and reports schema paths, implementation references and versions that do not resolve."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to plugin-checks.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workspace root (defaults to the nearest directory with nx.json)
    #[arg(long, global = true)]
    workspace_root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate plugin manifests
    Check(check::CheckCommand),

    /// List every diagnostic message
    Rules(rules::RulesCommand),

    /// List the projects of the workspace
    Projects(projects::ProjectsCommand),
}

impl Cli {
    /// Runs the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Derives the [`CliConfig`] from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            workspace_root: self.workspace_root.clone(),
        }
    }

    /// Runs the selected command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Check(cmd) => cmd.execute(&config).await,
            Commands::Rules(cmd) => cmd.execute(),
            Commands::Projects(cmd) => cmd.execute(&config).await,
        }
    }
}
