//! Collection manifests: `generators.json`, `executors.json`,
//! `migrations.json`.

use tracing::trace;

use super::entry::check_entry;
use super::{Diagnostic, ManifestKind, MessageKind, RuleContext};
use crate::json::JsonNode;

/// Validates a collection manifest whose root object is `root`.
///
/// Every root key of `kind` that is present is processed on its own, in the
/// order of [`ManifestKind::root_keys`]. With none present a single diagnostic
/// is reported at the root.
pub fn check_collection_file(ctx: &mut RuleContext<'_>, root: &JsonNode, kind: ManifestKind) {
    let mut found = false;

    for key in kind.root_keys() {
        let Some(property) = root.property(key) else {
            continue;
        };
        found = true;
        trace!("Checking `{key}` collection ({})", property.value.shape());

        if property.value.is_object() {
            check_collection(ctx, &property.value, kind);
        } else {
            ctx.report_key(MessageKind::ValueShouldBeObject, &property.value, key);
        }
    }

    if !found {
        ctx.report(Diagnostic::new(kind.missing_root_message(), root.location()));
    }
}

/// Validates every entry of a collection object.
pub fn check_collection(ctx: &mut RuleContext<'_>, collection: &JsonNode, kind: ManifestKind) {
    let Some(properties) = collection.as_object() else {
        return;
    };

    for property in properties {
        if property.value.is_object() {
            check_entry(ctx, &property.key, &property.value, kind);
        } else {
            ctx.report_key(MessageKind::ValueShouldBeObject, &property.value, &property.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationOptions;
    use crate::json::parse_document;
    use crate::resolver::ExportShape;
    use crate::rules::test_support::{StubLoader, ids};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn run(dir: &Path, loader: &StubLoader, text: &str, kind: ManifestKind) -> Vec<Diagnostic> {
        let root = parse_document(text).unwrap();
        let options = ValidationOptions::with_allowed_versions(["*", "latest", "next"]);
        let mut diagnostics = Vec::new();
        let mut ctx = RuleContext::new(dir, &options, loader, &mut diagnostics);
        check_collection_file(&mut ctx, &root, kind);
        diagnostics
    }

    #[test]
    fn test_valid_executors_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("schema.json"), "{}").unwrap();
        let build = temp.path().join("build.js");
        let loader = StubLoader::default().with_module(build.to_str().unwrap(), &[]);

        let diagnostics = run(
            temp.path(),
            &loader,
            r#"{"executors": {"build": {"schema": "./schema.json", "implementation": "./build.js"}}}"#,
            ManifestKind::Executor,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_roots() {
        let loader = StubLoader::default();
        let generators = run(Path::new("/ws"), &loader, r#"{"name": "x"}"#, ManifestKind::Generator);
        assert_eq!(ids(&generators), vec!["noGeneratorsOrSchematicsFound"]);
        assert_eq!(generators[0].location.pointer(), "");

        let migrations = run(Path::new("/ws"), &loader, "{}", ManifestKind::Migration);
        assert_eq!(ids(&migrations), vec!["noGeneratorsOrSchematicsFound"]);

        let executors = run(Path::new("/ws"), &loader, r#"{"generators": {}}"#, ManifestKind::Executor);
        assert_eq!(ids(&executors), vec!["noExecutorsOrBuildersFound"]);
    }

    #[test]
    fn test_non_object_root_reports_at_root_value() {
        let diagnostics = run(
            Path::new("/ws"),
            &StubLoader::default(),
            r#"{"generators": [], "schematics": "nope"}"#,
            ManifestKind::Generator,
        );
        assert_eq!(ids(&diagnostics), vec!["valueShouldBeObject", "valueShouldBeObject"]);
        assert_eq!(diagnostics[0].location.pointer(), "/schematics");
        assert_eq!(diagnostics[0].message(), "schematics should be an object");
        assert_eq!(diagnostics[1].location.pointer(), "/generators");
    }

    #[test]
    fn test_both_roots_are_validated() {
        let diagnostics = run(
            Path::new("/ws"),
            &StubLoader::default(),
            r#"{"generators": {"a": {}}, "schematics": {"b": {}}}"#,
            ManifestKind::Generator,
        );
        let keys: Vec<_> = diagnostics.iter().map(|d| d.substitutions["key"].as_str()).collect();
        assert_eq!(keys, vec!["b", "b", "a", "a"]);
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let diagnostics = run(
            Path::new("/ws"),
            &StubLoader::default(),
            r#"{"builders": {"bad": "./x", "worse": null}}"#,
            ManifestKind::Executor,
        );
        assert_eq!(ids(&diagnostics), vec!["valueShouldBeObject", "valueShouldBeObject"]);
        assert_eq!(diagnostics[0].location.pointer(), "/builders/bad");
        assert_eq!(diagnostics[1].substitutions["key"], "worse");
    }

    #[test]
    fn test_migration_entries() {
        let loader = StubLoader::default().with_module("/ws/m", &[("update", ExportShape::Callable)]);
        let diagnostics = run(
            Path::new("/ws"),
            &loader,
            r#"{"generators": {
                "ok": {"version": "1.0.0", "implementation": "./m#update"},
                "bad": {"version": "soon", "factory": "./m#missing"}
            }}"#,
            ManifestKind::Migration,
        );
        assert_eq!(ids(&diagnostics), vec!["invalidImplementationModule", "invalidVersion"]);
        assert_eq!(diagnostics[0].location.pointer(), "/generators/bad/factory");
    }
}
