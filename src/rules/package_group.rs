//! `packageGroup` checks for `package.json`.
//!
//! The migrations declaration lives under the first of `nx-migrations`,
//! `ng-update` or `migrations` whose value is an object. Its `packageGroup`
//! comes in two forms:
//!
//! ```json
//! { "packageGroup": { "@org/a": "1.0.0", "@org/b": "latest" } }
//! { "packageGroup": [ { "package": "@org/a", "version": "1.0.0" } ] }
//! ```
//!
//! Every version must pass the version check. Any other shape is ignored.

use super::version::is_valid_version;
use super::{MessageKind, RuleContext};
use crate::constants::{MIGRATION_DECLARATION_KEYS, UNKNOWN_PACKAGE};
use crate::json::JsonNode;

/// Validates the package group declared in the `package.json` at `root`.
pub fn check_package_json(ctx: &mut RuleContext<'_>, root: &JsonNode) {
    let Some(properties) = root.as_object() else {
        return;
    };
    let Some(declaration) = properties
        .iter()
        .find(|p| MIGRATION_DECLARATION_KEYS.contains(&p.key.as_str()) && p.value.is_object())
    else {
        return;
    };
    let Some(group) = declaration.value.property("packageGroup") else {
        return;
    };

    match &group.value {
        JsonNode::Array {
            elements,
            ..
        } => {
            for member in elements.iter().filter(|e| e.is_object()) {
                check_array_member(ctx, member);
            }
        }
        JsonNode::Object {
            properties,
            ..
        } => {
            for property in properties {
                if !is_valid_version(&property.value, &ctx.options.allowed_version_tokens) {
                    ctx.report_key(MessageKind::InvalidVersion, &property.value, &property.key);
                }
            }
        }
        JsonNode::Literal {
            ..
        } => {}
    }
}

fn check_array_member(ctx: &mut RuleContext<'_>, member: &JsonNode) {
    let package = member.property("package").and_then(|p| p.value.as_str()).unwrap_or(UNKNOWN_PACKAGE);

    match member.property("version") {
        None => ctx.report_key(MessageKind::MissingVersion, member, package),
        Some(version) => {
            if !is_valid_version(&version.value, &ctx.options.allowed_version_tokens) {
                ctx.report_key(MessageKind::InvalidVersion, &version.value, package);
            }
        }
    }
}
