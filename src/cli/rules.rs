//! Print the diagnostic message catalog.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::check::OutputFormat;
use crate::rules::{MessageKind, RULE_NAME};

/// List every message the checks can report.
#[derive(Args, Debug, Default)]
pub struct RulesCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    message_id: MessageKind,
    template: &'static str,
}

#[derive(Debug, Serialize)]
struct Catalog {
    rule: &'static str,
    messages: Vec<CatalogEntry>,
}

impl RulesCommand {
    /// Prints the catalog.
    pub fn execute(self) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog())?),
            OutputFormat::Text => print!("{}", render_text()),
        }
        Ok(())
    }
}

fn catalog() -> Catalog {
    Catalog {
        rule: RULE_NAME,
        messages: MessageKind::ALL
            .iter()
            .map(|kind| CatalogEntry {
                message_id: *kind,
                template: kind.template(),
            })
            .collect(),
    }
}

fn render_text() -> String {
    let width = MessageKind::ALL.iter().map(|k| k.id().len()).max().unwrap_or(0);
    let mut out = format!("{}\n", RULE_NAME.bold());
    for kind in MessageKind::ALL {
        out.push_str(&format!("  {:<width$}  {}\n", kind.id(), kind.template()));
    }
    out
}
