//! Workspace configuration for plugin-checks.
//!
//! Options may live in a `plugin-checks.toml` file at the workspace root. The
//! file is optional; without it every option takes its default.
//!
//! # File Format
//!
//! ```toml
//! # Manifest file names, relative to each project root ("" disables a kind)
//! generatorsJson = "generators.json"
//! executorsJson = "executors.json"
//! migrationsJson = "migrations.json"
//! packageJson = "package.json"
//!
//! # Non-semver version strings accepted in migrations and package groups
//! allowedVersionStrings = ["*", "latest", "next"]
//!
//! # TypeScript config registered for module resolution
//! tsconfig = "tsconfig.base.json"
//!
//! # Globs (relative to the workspace root) skipped during project discovery
//! exclude = ["apps/legacy/**"]
//! ```
//!
//! # Configuration File Location
//!
//! In priority order:
//!
//! 1. the `--config` command line flag,
//! 2. the `PLUGIN_CHECKS_CONFIG` environment variable,
//! 3. `<workspace root>/plugin-checks.toml`.
//!
//! An explicitly named file must exist; the default location may be absent.

pub mod options;

pub use options::{RuleOptions, ValidationOptions};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_TSCONFIG};
use crate::core::PluginCheckError;
use crate::utils::fs::join_relative;

/// Contents of `plugin-checks.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    /// Rule options, written at the top level of the file.
    #[serde(flatten)]
    pub options: RuleOptions,

    /// TypeScript config path relative to the workspace root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsconfig: Option<String>,

    /// Glob patterns excluded from project discovery.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl CheckConfig {
    /// Loads the configuration for `workspace_root`.
    ///
    /// `explicit` (from the command line) wins over the environment variable,
    /// which wins over the default file name.
    ///
    /// # Errors
    ///
    /// Fails when an explicitly named file is missing, or when any chosen file
    /// cannot be read or is not valid TOML for this schema.
    pub async fn load(workspace_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let (path, required) = match (explicit, from_env) {
            (Some(path), _) => (path.to_path_buf(), true),
            (None, Some(path)) => (path, true),
            (None, None) => (workspace_root.join(CONFIG_FILE_NAME), false),
        };

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            if required {
                return Err(PluginCheckError::ConfigParseError {
                    file: path.display().to_string(),
                    reason: "file does not exist".to_string(),
                }
                .into());
            }
            debug!("No configuration file at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content, &path)
    }

    /// Parses configuration text; `file` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`PluginCheckError::ConfigParseError`] for invalid TOML or
    /// values of the wrong type.
    pub fn from_toml_str(content: &str, file: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            PluginCheckError::ConfigParseError {
                file: file.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Returns a copy whose options are `overrides` merged over the file's.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &RuleOptions) -> Self {
        self.options = overrides.merged_over(&self.options);
        self
    }

    /// Absolute path of the TypeScript config registered for resolution.
    #[must_use]
    pub fn tsconfig_path(&self, workspace_root: &Path) -> PathBuf {
        join_relative(workspace_root, self.tsconfig.as_deref().unwrap_or(DEFAULT_TSCONFIG))
    }
}
