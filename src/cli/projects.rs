//! List discovered projects and the manifests they declare.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::CliConfig;
use super::check::OutputFormat;
use super::common::CommandContext;
use crate::config::RuleOptions;
use crate::utils::{display_relative, normalize_path_for_storage};

/// List the projects of the workspace.
#[derive(Args, Debug, Default)]
pub struct ProjectsCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ProjectSummary {
    name: String,
    root: String,
    manifests: Vec<String>,
}

impl ProjectsCommand {
    /// Prints every project with the manifests present on disk.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(cli, &RuleOptions::default(), None).await?;
        let summaries = summarize(&ctx).await;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
            OutputFormat::Text => {
                if summaries.is_empty() {
                    println!("No projects found in {}", ctx.workspace_root.display());
                }
                for project in &summaries {
                    println!("{} {}", project.name.bold(), format!("({})", project.root).dimmed());
                    for manifest in &project.manifests {
                        println!("  {manifest}");
                    }
                }
            }
        }
        Ok(())
    }
}

async fn summarize(ctx: &CommandContext) -> Vec<ProjectSummary> {
    let scope = ctx.scope_resolver();
    let mut summaries = Vec::new();

    for project in ctx.graph.projects() {
        let options = scope.options_for(project);
        let project_dir = ctx.graph.project_dir(project);
        let mut manifests = Vec::new();
        for path in [options.generators_file, options.migrations_file, options.executors_file, options.package_file]
            .into_iter()
            .flatten()
        {
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                manifests.push(display_relative(&path, &project_dir));
            }
        }

        let root = normalize_path_for_storage(&project.root);
        summaries.push(ProjectSummary {
            name: project.name.clone(),
            root: if root.is_empty() { ".".to_string() } else { root },
            manifests,
        });
    }
    summaries
}
