//! Workspace loading shared by the commands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::CliConfig;
use crate::config::{CheckConfig, RuleOptions};
use crate::utils::fs::{absolutize, find_workspace_root};
use crate::workspace::{ProjectGraph, ScopeResolver};

/// The workspace a command operates on.
#[derive(Debug)]
pub struct CommandContext {
    /// Canonical workspace root.
    pub workspace_root: PathBuf,
    /// Directory the command was started from.
    pub cwd: PathBuf,
    /// Configuration file merged with command line overrides.
    pub config: CheckConfig,
    /// Discovered projects.
    pub graph: ProjectGraph,
}

impl CommandContext {
    /// Locates the workspace, loads its configuration and discovers its
    /// projects.
    ///
    /// `overrides` and `tsconfig` come from command flags and win over the
    /// configuration file.
    pub async fn load(
        cli: &CliConfig,
        overrides: &RuleOptions,
        tsconfig: Option<String>,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
        let workspace_root = match &cli.workspace_root {
            Some(root) => {
                let root = absolutize(root, &cwd);
                root.canonicalize()
                    .with_context(|| format!("Workspace root {} does not exist", root.display()))?
            }
            None => find_workspace_root(&cwd)?,
        };
        debug!("Workspace root: {}", workspace_root.display());

        let config_path = cli.config_path.as_deref().map(|path| absolutize(path, &cwd));
        let mut config = CheckConfig::load(&workspace_root, config_path.as_deref())
            .await?
            .with_overrides(overrides);
        if tsconfig.is_some() {
            config.tsconfig = tsconfig;
        }

        let graph = ProjectGraph::discover(&workspace_root, &config.exclude)?;
        debug!("Discovered {} project(s)", graph.projects().len());

        Ok(Self {
            workspace_root,
            cwd,
            config,
            graph,
        })
    }

    /// A scope resolver over the discovered projects.
    #[must_use]
    pub fn scope_resolver(&self) -> ScopeResolver {
        ScopeResolver::new(self.graph.clone(), self.config.options.clone())
    }

    /// Absolute TypeScript config path.
    #[must_use]
    pub fn tsconfig_path(&self) -> PathBuf {
        self.config.tsconfig_path(&self.workspace_root)
    }

    /// Makes a command line path absolute against the starting directory.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        absolutize(path, &self.cwd)
    }
}
