//! Aggregated outcome of a `check` run.

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::json::Location;
use crate::rules::{Diagnostic, MessageKind, RULE_NAME};

/// One diagnostic, tagged with its file, as printed in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedDiagnostic {
    /// File path relative to the workspace root.
    pub file: String,
    /// Reporting rule name.
    pub rule: &'static str,
    /// Stable message id.
    pub message_id: MessageKind,
    /// JSON Pointer of the offending node.
    pub location: Location,
    /// Rendered message.
    pub message: String,
    /// Template substitutions.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl ReportedDiagnostic {
    /// Tags `diagnostic` with `file`.
    #[must_use]
    pub fn new(file: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self {
            file: file.into(),
            rule: RULE_NAME,
            message_id: diagnostic.message_kind,
            message: diagnostic.message(),
            location: diagnostic.location,
            data: diagnostic.substitutions,
        }
    }
}

/// Results of one `check` run; serialized as-is for `--format json`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResults {
    /// No diagnostics and no errors.
    pub valid: bool,
    /// Manifests that were validated.
    pub files_checked: usize,
    /// Named files that turned out not to be manifests.
    pub files_skipped: usize,
    /// Every reported diagnostic, in file order.
    pub diagnostics: Vec<ReportedDiagnostic>,
    /// Files that could not be read or parsed.
    pub errors: Vec<String>,
}

impl CheckResults {
    /// Recomputes [`valid`](Self::valid).
    pub fn finish(&mut self) {
        self.valid = self.diagnostics.is_empty() && self.errors.is_empty();
    }

    /// Number of files with at least one diagnostic.
    #[must_use]
    pub fn files_with_problems(&self) -> usize {
        let mut files: Vec<&str> = self.diagnostics.iter().map(|d| d.file.as_str()).collect();
        files.dedup();
        files.len()
    }

    /// The human readable report.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let mut current: Option<&str> = None;

        for diagnostic in &self.diagnostics {
            if current != Some(diagnostic.file.as_str()) {
                if current.is_some() {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}", diagnostic.file.underline());
                current = Some(&diagnostic.file);
            }
            let _ = writeln!(
                out,
                "  {}  {}  {}",
                diagnostic.location.to_string().dimmed(),
                diagnostic.message,
                format!("{}/{}", diagnostic.rule, diagnostic.message_id).dimmed()
            );
        }

        if !self.errors.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            for error in &self.errors {
                let _ = writeln!(out, "{} {}", "✗".red(), error);
            }
        }

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.summary());
        out.push('\n');
        out
    }

    fn summary(&self) -> String {
        let files = plural(self.files_checked, "checked file", "checked files");
        if self.valid {
            return format!("{} No problems in {}", "✓".green(), files);
        }

        let mut parts = Vec::new();
        if !self.diagnostics.is_empty() {
            parts.push(format!(
                "{} in {} of {}",
                plural(self.diagnostics.len(), "problem", "problems"),
                self.files_with_problems(),
                files
            ));
        }
        if !self.errors.is_empty() {
            parts.push(plural(self.errors.len(), "file could not be checked", "files could not be checked"));
        }
        format!("{} {}", "✗".red(), parts.join(", "))
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}
