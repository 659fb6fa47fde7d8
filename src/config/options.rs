//! Rule options and their normalisation.
//!
//! [`RuleOptions`] is what a user writes (every field optional, camelCase
//! keys). [`RuleOptions::normalize`] merges it onto the defaults and anchors
//! the manifest file names at the owning project's root, producing the
//! immutable [`ValidationOptions`] used for one manifest visit.
//!
//! A file name set to the empty string turns that manifest kind off.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ALLOWED_VERSION_STRINGS, DEFAULT_EXECUTORS_JSON, DEFAULT_GENERATORS_JSON,
    DEFAULT_MIGRATIONS_JSON, DEFAULT_PACKAGE_JSON,
};
use crate::utils::fs::join_relative;

/// User-facing rule options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOptions {
    /// Generators manifest, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generators_json: Option<String>,
    /// Executors manifest, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executors_json: Option<String>,
    /// Migrations manifest, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrations_json: Option<String>,
    /// Package manifest, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_json: Option<String>,
    /// Non-semver version strings that are accepted as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_version_strings: Option<Vec<String>>,
}

impl RuleOptions {
    /// The documented defaults with every field filled in.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            generators_json: Some(DEFAULT_GENERATORS_JSON.to_string()),
            executors_json: Some(DEFAULT_EXECUTORS_JSON.to_string()),
            migrations_json: Some(DEFAULT_MIGRATIONS_JSON.to_string()),
            package_json: Some(DEFAULT_PACKAGE_JSON.to_string()),
            allowed_version_strings: Some(
                DEFAULT_ALLOWED_VERSION_STRINGS.iter().map(|s| (*s).to_string()).collect(),
            ),
        }
    }

    /// Fields set in `self` win; unset fields come from `base`.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            generators_json: self.generators_json.clone().or_else(|| base.generators_json.clone()),
            executors_json: self.executors_json.clone().or_else(|| base.executors_json.clone()),
            migrations_json: self.migrations_json.clone().or_else(|| base.migrations_json.clone()),
            package_json: self.package_json.clone().or_else(|| base.package_json.clone()),
            allowed_version_strings: self
                .allowed_version_strings
                .clone()
                .or_else(|| base.allowed_version_strings.clone()),
        }
    }

    /// Merges onto the defaults and anchors file names at `project_dir`.
    #[must_use]
    pub fn normalize(&self, project_dir: &Path) -> ValidationOptions {
        let merged = self.merged_over(&Self::defaults());
        let anchor = |name: &Option<String>| -> Option<PathBuf> {
            name.as_deref().filter(|n| !n.is_empty()).map(|n| join_relative(project_dir, n))
        };

        ValidationOptions {
            generators_file: anchor(&merged.generators_json),
            executors_file: anchor(&merged.executors_json),
            migrations_file: anchor(&merged.migrations_json),
            package_file: anchor(&merged.package_json),
            allowed_version_tokens: merged.allowed_version_strings.unwrap_or_default().into_iter().collect(),
        }
    }
}

/// Options for one manifest visit, with absolute manifest paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Absolute generators manifest path, if enabled.
    pub generators_file: Option<PathBuf>,
    /// Absolute executors manifest path, if enabled.
    pub executors_file: Option<PathBuf>,
    /// Absolute migrations manifest path, if enabled.
    pub migrations_file: Option<PathBuf>,
    /// Absolute package manifest path, if enabled.
    pub package_file: Option<PathBuf>,
    /// Exact non-semver strings accepted as versions.
    pub allowed_version_tokens: BTreeSet<String>,
}

impl ValidationOptions {
    /// Options with no manifest files, only an allow-list; handy for unit tests
    /// of the version and package-group checks.
    #[must_use]
    pub fn with_allowed_versions<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            generators_file: None,
            executors_file: None,
            migrations_file: None,
            package_file: None,
            allowed_version_tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_applies_defaults() {
        let options = RuleOptions::default().normalize(Path::new("/ws/libs/plugin"));

        assert_eq!(options.generators_file, Some(PathBuf::from("/ws/libs/plugin/generators.json")));
        assert_eq!(options.executors_file, Some(PathBuf::from("/ws/libs/plugin/executors.json")));
        assert_eq!(options.migrations_file, Some(PathBuf::from("/ws/libs/plugin/migrations.json")));
        assert_eq!(options.package_file, Some(PathBuf::from("/ws/libs/plugin/package.json")));
        let tokens: Vec<_> = options.allowed_version_tokens.iter().map(String::as_str).collect();
        assert_eq!(tokens, vec!["*", "latest", "next"]);
    }

    #[test]
    fn test_overrides_replace_defaults_field_by_field() {
        let overrides = RuleOptions {
            generators_json: Some("collection.json".to_string()),
            allowed_version_strings: Some(vec!["nightly".to_string()]),
            ..Default::default()
        };
        let options = overrides.normalize(Path::new("/ws/p"));

        assert_eq!(options.generators_file, Some(PathBuf::from("/ws/p/collection.json")));
        assert_eq!(options.executors_file, Some(PathBuf::from("/ws/p/executors.json")));
        assert!(options.allowed_version_tokens.contains("nightly"));
        assert!(!options.allowed_version_tokens.contains("*"));
    }

    #[test]
    fn test_empty_file_name_disables_kind() {
        let overrides = RuleOptions {
            package_json: Some(String::new()),
            ..Default::default()
        };
        let options = overrides.normalize(Path::new("/ws/p"));
        assert_eq!(options.package_file, None);
        assert!(options.generators_file.is_some());
    }

    #[test]
    fn test_nested_file_names_are_normalised() {
        let overrides = RuleOptions {
            executors_json: Some("./src/../builders.json".to_string()),
            ..Default::default()
        };
        let options = overrides.normalize(Path::new("/ws/p"));
        assert_eq!(options.executors_file, Some(PathBuf::from("/ws/p/builders.json")));
    }

    #[test]
    fn test_merged_over_prefers_self() {
        let file = RuleOptions {
            migrations_json: Some("a.json".to_string()),
            package_json: Some("b.json".to_string()),
            ..Default::default()
        };
        let cli = RuleOptions {
            package_json: Some("c.json".to_string()),
            ..Default::default()
        };
        let merged = cli.merged_over(&file);
        assert_eq!(merged.migrations_json.as_deref(), Some("a.json"));
        assert_eq!(merged.package_json.as_deref(), Some("c.json"));
    }

    #[test]
    fn test_deserializes_camel_case_keys() {
        let options: RuleOptions = serde_json::from_str(
            r#"{"generatorsJson": "g.json", "allowedVersionStrings": ["*"]}"#,
        )
        .unwrap();
        assert_eq!(options.generators_json.as_deref(), Some("g.json"));
        assert_eq!(options.allowed_version_strings, Some(vec!["*".to_string()]));
    }
}
