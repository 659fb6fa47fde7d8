//! Runs the `check` command.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

use super::command::{CheckCommand, OutputFormat};
use super::results::{CheckResults, ReportedDiagnostic};
use crate::cli::CliConfig;
use crate::cli::common::CommandContext;
use crate::core::PluginCheckError;
use crate::resolver::NodeModuleLoader;
use crate::rules::{CheckOutcome, Diagnostic, PluginChecks};
use crate::utils::display_relative;

impl CheckCommand {
    /// Loads the workspace, checks the selected files and prints the report.
    ///
    /// # Errors
    ///
    /// Fails when the workspace cannot be loaded, and with
    /// [`PluginCheckError::ChecksFailed`] when anything was reported.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(cli, &self.rule_overrides(), self.tsconfig.clone()).await?;
        let results = self.run(&ctx).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => print!("{}", results.render_text()),
        }

        if results.valid {
            Ok(())
        } else {
            Err(PluginCheckError::ChecksFailed {
                problems: results.diagnostics.len(),
                errors: results.errors.len(),
            }
            .into())
        }
    }

    /// Checks the selected files of `ctx` without printing anything.
    pub async fn run(&self, ctx: &CommandContext) -> Result<CheckResults> {
        let scope = ctx.scope_resolver();
        let targets = if self.files.is_empty() {
            let mut existing = Vec::new();
            for path in scope.manifest_paths() {
                if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                    existing.push(path);
                } else {
                    debug!("{} does not exist; skipping", path.display());
                }
            }
            existing
        } else {
            self.files.iter().map(|file| ctx.resolve_path(file)).collect::<Vec<PathBuf>>()
        };
        info!("Checking {} file(s)", targets.len());

        let mut checks = PluginChecks::new(scope, ctx.tsconfig_path(), NodeModuleLoader::new()?);
        let mut results = CheckResults::default();

        for file in targets {
            let shown = display_relative(&file, &ctx.workspace_root);
            let text = match tokio::fs::read_to_string(&file).await {
                Ok(text) => text,
                Err(e) => {
                    results.errors.push(format!("{shown}: {e}"));
                    continue;
                }
            };

            let mut diagnostics: Vec<Diagnostic> = Vec::new();
            match checks.check_source(&file, &text, &mut diagnostics) {
                Ok(CheckOutcome::Checked(kind)) => {
                    debug!("{shown}: {} diagnostic(s) as {kind:?}", diagnostics.len());
                    results.files_checked += 1;
                }
                Ok(CheckOutcome::Skipped) => {
                    debug!("{shown} is not a plugin manifest");
                    results.files_skipped += 1;
                }
                Err(e) => results.errors.push(format!("{shown}: {e}")),
            }
            results
                .diagnostics
                .extend(diagnostics.into_iter().map(|d| ReportedDiagnostic::new(shown.clone(), d)));
        }

        results.finish();
        Ok(results)
    }
}
