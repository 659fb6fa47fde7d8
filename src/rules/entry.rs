//! Validation of a single collection entry.

use serde_json::Value;
use std::fs;

use super::implementation::check_implementation;
use super::version::is_valid_version;
use super::{ManifestKind, MessageKind, RuleContext};
use crate::constants::IMPLEMENTATION_KEYS;
use crate::json::{JsonNode, from_jsonc};
use crate::utils::fs::join_relative;

/// Validates entry `key` of a `kind` collection.
///
/// Runs, in order and without stopping early:
///
/// 1. the schema check (not for migrations),
/// 2. the implementation check,
/// 3. the version check (migrations only).
pub fn check_entry(ctx: &mut RuleContext<'_>, key: &str, entry: &JsonNode, kind: ManifestKind) {
    if kind != ManifestKind::Migration {
        check_schema(ctx, key, entry);
    }

    match entry.property_any(&IMPLEMENTATION_KEYS) {
        Some(implementation) => check_implementation(ctx, key, &implementation.value),
        None => ctx.report_key(MessageKind::MissingImplementation, entry, key),
    }

    if kind == ManifestKind::Migration {
        check_version(ctx, key, entry);
    }
}

fn check_schema(ctx: &mut RuleContext<'_>, key: &str, entry: &JsonNode) {
    let Some(schema) = entry.property("schema") else {
        ctx.report_key(MessageKind::MissingRequiredSchema, entry, key);
        return;
    };

    let valid = match schema.value.as_str() {
        Some(path) => is_json_file(ctx, path),
        None => false,
    };
    if !valid {
        ctx.report_key(MessageKind::InvalidSchemaPath, &schema.value, key);
    }
}

fn is_json_file(ctx: &RuleContext<'_>, relative: &str) -> bool {
    let path = join_relative(ctx.manifest_dir, relative);
    match fs::read_to_string(&path) {
        Ok(content) => match from_jsonc::<Value>(&content) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Schema {} is not valid JSON: {e}", path.display());
                false
            }
        },
        Err(e) => {
            tracing::debug!("Schema {} is unreadable: {e}", path.display());
            false
        }
    }
}

fn check_version(ctx: &mut RuleContext<'_>, key: &str, entry: &JsonNode) {
    match entry.property("version") {
        None => ctx.report_key(MessageKind::MissingVersion, entry, key),
        Some(version) => {
            if !is_valid_version(&version.value, &ctx.options.allowed_version_tokens) {
                ctx.report_key(MessageKind::InvalidVersion, &version.value, key);
            }
        }
    }
}
