//! The `nx-plugin-checks` rule.
//!
//! Validation runs over a parsed [`JsonNode`] tree and reports
//! [`Diagnostic`]s into a [`DiagnosticSink`]. Each check lives in its own
//! module, leaf first:
//!
//! - [`version`] - version token acceptance
//! - [`implementation`] - `path#export` references
//! - [`entry`] - one generator, executor or migration entry
//! - [`collection`] - collection roots and their entries
//! - [`package_group`] - `packageGroup` inside `package.json`
//! - [`plugin_checks`] - the per-session entry point tying scope, environment
//!   registration and the checks together
//!
//! Findings are never errors. A check that cannot resolve a schema or an
//! implementation reports a diagnostic at the offending node and carries on
//! with the next check; all applicable checks always run.

pub mod collection;
pub mod entry;
pub mod implementation;
pub mod package_group;
pub mod plugin_checks;
pub mod version;

pub use plugin_checks::{CheckOutcome, PluginChecks};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::config::ValidationOptions;
use crate::json::{JsonNode, Location};
use crate::resolver::ModuleLoader;

pub use crate::constants::RULE_NAME;

/// Identifier of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    InvalidSchemaPath,
    InvalidImplementationPath,
    InvalidImplementationModule,
    UnableToReadImplementationExports,
    InvalidVersion,
    NoGeneratorsOrSchematicsFound,
    NoExecutorsOrBuildersFound,
    ValueShouldBeObject,
    MissingRequiredSchema,
    MissingImplementation,
    MissingVersion,
}

impl MessageKind {
    /// Every message in catalog order.
    pub const ALL: [Self; 11] = [
        Self::InvalidSchemaPath,
        Self::InvalidImplementationPath,
        Self::InvalidImplementationModule,
        Self::UnableToReadImplementationExports,
        Self::InvalidVersion,
        Self::NoGeneratorsOrSchematicsFound,
        Self::NoExecutorsOrBuildersFound,
        Self::ValueShouldBeObject,
        Self::MissingRequiredSchema,
        Self::MissingImplementation,
        Self::MissingVersion,
    ];

    /// The stable message id.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::InvalidSchemaPath => "invalidSchemaPath",
            Self::InvalidImplementationPath => "invalidImplementationPath",
            Self::InvalidImplementationModule => "invalidImplementationModule",
            Self::UnableToReadImplementationExports => "unableToReadImplementationExports",
            Self::InvalidVersion => "invalidVersion",
            Self::NoGeneratorsOrSchematicsFound => "noGeneratorsOrSchematicsFound",
            Self::NoExecutorsOrBuildersFound => "noExecutorsOrBuildersFound",
            Self::ValueShouldBeObject => "valueShouldBeObject",
            Self::MissingRequiredSchema => "missingRequiredSchema",
            Self::MissingImplementation => "missingImplementation",
            Self::MissingVersion => "missingVersion",
        }
    }

    /// The message template; `{{ name }}` marks a substitution.
    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            Self::InvalidSchemaPath => "Schema path should point to a valid file",
            Self::InvalidImplementationPath => {
                "{{ key }}: Implementation path should point to a valid file"
            }
            Self::InvalidImplementationModule => {
                "{{ key }}: Unable to find export {{ identifier }} in implementation module"
            }
            Self::UnableToReadImplementationExports => {
                "{{ key }}: Unable to read exports for implementation module"
            }
            Self::InvalidVersion => "{{ key }}: Version should be a valid semver",
            Self::NoGeneratorsOrSchematicsFound => "Unable to find `generators` or `schematics` property",
            Self::NoExecutorsOrBuildersFound => "Unable to find `executors` or `builders` property",
            Self::ValueShouldBeObject => "{{ key }} should be an object",
            Self::MissingRequiredSchema => "{{ key }}: Missing required property - `schema`",
            Self::MissingImplementation => "{{ key }}: Missing required property - `implementation`",
            Self::MissingVersion => "{{ key }}: Missing required property - `version`",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One finding, attached to a node of the visited document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Which message this is.
    #[serde(rename = "messageId")]
    pub message_kind: MessageKind,
    /// The node the finding is about.
    pub location: Location,
    /// Values for the template placeholders.
    #[serde(rename = "data", skip_serializing_if = "BTreeMap::is_empty")]
    pub substitutions: BTreeMap<String, String>,
}

impl Diagnostic {
    /// A diagnostic without substitutions.
    #[must_use]
    pub fn new(message_kind: MessageKind, location: &Location) -> Self {
        Self {
            message_kind,
            location: location.clone(),
            substitutions: BTreeMap::new(),
        }
    }

    /// Adds a substitution.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.substitutions.insert(name.to_string(), value.into());
        self
    }

    /// The rendered message. Placeholders without a value are left as written.
    #[must_use]
    pub fn message(&self) -> String {
        let template = self.message_kind.template();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };
            let name = after[..end].trim();
            match self.substitutions.get(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message())
    }
}

/// Receives diagnostics as they are produced.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Kind of a collection manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Generator,
    Migration,
    Executor,
}

impl ManifestKind {
    /// Root property names that hold this kind's collection.
    #[must_use]
    pub fn root_keys(self) -> &'static [&'static str] {
        match self {
            Self::Generator | Self::Migration => &crate::constants::GENERATOR_ROOT_KEYS,
            Self::Executor => &crate::constants::EXECUTOR_ROOT_KEYS,
        }
    }

    /// Reported when none of [`root_keys`](Self::root_keys) is present.
    #[must_use]
    pub fn missing_root_message(self) -> MessageKind {
        match self {
            Self::Generator | Self::Migration => MessageKind::NoGeneratorsOrSchematicsFound,
            Self::Executor => MessageKind::NoExecutorsOrBuildersFound,
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generator => write!(f, "generators"),
            Self::Migration => write!(f, "migrations"),
            Self::Executor => write!(f, "executors"),
        }
    }
}

/// Everything a check needs while visiting one manifest.
pub struct RuleContext<'a> {
    /// Directory of the visited manifest; references are relative to it.
    pub manifest_dir: &'a Path,
    /// Normalised options for this visit.
    pub options: &'a ValidationOptions,
    /// Module resolution and export inspection.
    pub loader: &'a dyn ModuleLoader,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for one manifest visit.
    pub fn new(
        manifest_dir: &'a Path,
        options: &'a ValidationOptions,
        loader: &'a dyn ModuleLoader,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            manifest_dir,
            options,
            loader,
            sink,
        }
    }

    /// Reports `diagnostic` to the sink.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!("{} at {}", diagnostic.message_kind, diagnostic.location);
        self.sink.report(diagnostic);
    }

    /// Reports `kind` at `node` with a `key` substitution.
    pub fn report_key(&mut self, kind: MessageKind, node: &JsonNode, key: &str) {
        self.report(Diagnostic::new(kind, node.location()).with("key", key));
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_complete_and_unique() {
        let mut ids: Vec<_> = MessageKind::ALL.iter().map(|k| k.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn test_serialized_id_matches_id() {
        for kind in MessageKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.id()));
        }
    }

    #[test]
    fn test_message_substitutes_placeholders() {
        let diagnostic = Diagnostic::new(MessageKind::InvalidImplementationModule, &Location::root())
            .with("key", "app")
            .with("identifier", "createGenerator");
        assert_eq!(
            diagnostic.message(),
            "app: Unable to find export createGenerator in implementation module"
        );
    }

    #[test]
    fn test_message_keeps_unknown_placeholders() {
        let diagnostic = Diagnostic::new(MessageKind::InvalidVersion, &Location::root());
        assert_eq!(diagnostic.message(), "{{ key }}: Version should be a valid semver");
    }

    #[test]
    fn test_message_without_placeholders() {
        let diagnostic = Diagnostic::new(MessageKind::NoExecutorsOrBuildersFound, &Location::root());
        assert_eq!(diagnostic.message(), "Unable to find `executors` or `builders` property");
    }

    #[test]
    fn test_diagnostic_serializes_with_message_id() {
        let diagnostic = Diagnostic::new(MessageKind::MissingVersion, &Location::root().child("m1"))
            .with("key", "m1");
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["messageId"], "missingVersion");
        assert_eq!(json["location"], "/m1");
        assert_eq!(json["data"]["key"], "m1");
    }
}
