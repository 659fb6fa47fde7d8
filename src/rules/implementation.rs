//! Implementation reference checks.
//!
//! An `implementation` (or `factory`) value must be a string of the form
//! `path` or `path#exportName`. The path is resolved relative to the manifest
//! directory; when an export name is given, the module must export it and
//! the export must be callable.

use tracing::debug;

use super::{Diagnostic, MessageKind, RuleContext};
use crate::json::JsonNode;
use crate::resolver::ImplementationReference;

/// Checks the implementation `value` of entry `key`.
///
/// At most one diagnostic is reported. An unresolvable module skips the
/// export check.
pub fn check_implementation(ctx: &mut RuleContext<'_>, key: &str, value: &JsonNode) {
    let Some(raw) = value.as_str() else {
        ctx.report_key(MessageKind::InvalidImplementationPath, value, key);
        return;
    };

    let reference = ImplementationReference::parse(raw, ctx.manifest_dir);
    let module = match ctx.loader.resolve(&reference.module_path) {
        Ok(module) => module,
        Err(e) => {
            debug!("{key}: {e}");
            ctx.report_key(MessageKind::InvalidImplementationPath, value, key);
            return;
        }
    };

    let Some(export_name) = reference.export_name else {
        return;
    };

    match ctx.loader.inspect_export(&module, &export_name) {
        Ok(Some(shape)) if shape.is_callable() => {}
        Ok(_) => ctx.report(
            Diagnostic::new(MessageKind::InvalidImplementationModule, value.location())
                .with("identifier", export_name)
                .with("key", key),
        ),
        Err(e) => {
            debug!("{key}: {e}");
            ctx.report_key(MessageKind::UnableToReadImplementationExports, value, key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationOptions;
    use crate::json::{Location, parse_document};
    use crate::resolver::ExportShape;
    use crate::rules::test_support::{StubLoader, ids};
    use std::path::Path;

    fn run(loader: &StubLoader, raw: serde_json::Value) -> Vec<Diagnostic> {
        let node = crate::json::JsonNode::from_value(raw, Location::root().child("implementation"));
        let options = ValidationOptions::with_allowed_versions(Vec::<String>::new());
        let mut diagnostics = Vec::new();
        let mut ctx = RuleContext::new(Path::new("/ws/p"), &options, loader, &mut diagnostics);
        check_implementation(&mut ctx, "app", &node);
        diagnostics
    }

    #[test]
    fn test_resolvable_path_without_export_is_enough() {
        let loader = StubLoader::default().with_module("/ws/p/impl", &[]);
        assert!(run(&loader, serde_json::json!("./impl")).is_empty());
    }

    #[test]
    fn test_missing_export_reports_identifier() {
        let loader = StubLoader::default().with_module("/ws/p/impl", &[("other", ExportShape::Callable)]);
        let diagnostics = run(&loader, serde_json::json!("./impl#createGenerator"));

        assert_eq!(ids(&diagnostics), vec!["invalidImplementationModule"]);
        assert_eq!(diagnostics[0].substitutions["identifier"], "createGenerator");
        assert_eq!(diagnostics[0].substitutions["key"], "app");
        assert_eq!(diagnostics[0].location.pointer(), "/implementation");
    }

    #[test]
    fn test_non_callable_export_is_invalid() {
        let loader = StubLoader::default().with_module("/ws/p/impl", &[("schema", ExportShape::Value)]);
        let diagnostics = run(&loader, serde_json::json!("./impl#schema"));
        assert_eq!(ids(&diagnostics), vec!["invalidImplementationModule"]);
    }

    #[test]
    fn test_callable_and_opaque_exports_pass() {
        let loader = StubLoader::default().with_module(
            "/ws/p/impl",
            &[("gen", ExportShape::Callable), ("wrapped", ExportShape::Opaque)],
        );
        assert!(run(&loader, serde_json::json!("./impl#gen")).is_empty());
        assert!(run(&loader, serde_json::json!("./impl#wrapped")).is_empty());
    }

    #[test]
    fn test_unresolvable_path_skips_export_check() {
        let loader = StubLoader::default();
        let diagnostics = run(&loader, serde_json::json!("./missing#gen"));
        assert_eq!(ids(&diagnostics), vec!["invalidImplementationPath"]);
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn test_load_failure_is_reported() {
        let loader = StubLoader::default().with_broken_module("/ws/p/impl");
        let diagnostics = run(&loader, serde_json::json!("./impl#gen"));
        assert_eq!(ids(&diagnostics), vec!["unableToReadImplementationExports"]);
    }

    #[test]
    fn test_empty_export_name_is_absent() {
        let loader = StubLoader::default().with_broken_module("/ws/p/impl");
        assert!(run(&loader, serde_json::json!("./impl#")).is_empty());
    }

    #[test]
    fn test_non_string_value() {
        let loader = StubLoader::default();
        let diagnostics = run(&loader, serde_json::json!(["./impl"]));
        assert_eq!(ids(&diagnostics), vec!["invalidImplementationPath"]);
        assert_eq!(diagnostics[0].message(), "app: Implementation path should point to a valid file");
        assert_eq!(loader.calls.get(), 0);
    }

    #[test]
    fn test_leading_slash_stays_under_manifest_dir() {
        let loader = StubLoader::default().with_module("/ws/p/impl", &[]);
        let node = parse_document("\"/impl\"").unwrap();
        let options = ValidationOptions::with_allowed_versions(Vec::<String>::new());
        let mut diagnostics = Vec::new();
        let mut ctx = RuleContext::new(Path::new("/ws/p"), &options, &loader, &mut diagnostics);
        check_implementation(&mut ctx, "app", &node);
        assert!(diagnostics.is_empty());
    }
}
