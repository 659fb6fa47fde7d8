//! Version token acceptance.
//!
//! A version is acceptable when it is a string literal that is either a
//! strict semantic version or an exact member of the configured allow-list
//! (`*`, `latest` and `next` by default).
//!
//! Strictness follows node-semver's non-loose `valid()`: the string is
//! trimmed, one leading `v` is tolerated, anything longer than 256
//! characters is rejected before parsing, and major, minor and patch must not
//! exceed `Number.MAX_SAFE_INTEGER`.

use std::collections::BTreeSet;

use crate::constants::{MAX_VERSION_COMPONENT, MAX_VERSION_LENGTH};
use crate::json::JsonNode;

/// Whether `text` is a strict semantic version.
///
/// # Examples
///
/// ```rust
/// use plugin_checks::rules::version::is_valid_semver;
///
/// assert!(is_valid_semver("1.2.3"));
/// assert!(is_valid_semver("v1.2.3-beta.1+build.5"));
/// assert!(!is_valid_semver("1.2"));
/// assert!(!is_valid_semver("^1.2.3"));
/// ```
#[must_use]
pub fn is_valid_semver(text: &str) -> bool {
    if text.len() > MAX_VERSION_LENGTH {
        return false;
    }
    let trimmed = text.trim();
    let candidate = trimmed.strip_prefix('v').unwrap_or(trimmed);
    semver::Version::parse(candidate).is_ok_and(|version| {
        [version.major, version.minor, version.patch]
            .iter()
            .all(|&component| component <= MAX_VERSION_COMPONENT)
    })
}

/// Whether `node` holds an acceptable version token.
#[must_use]
pub fn is_valid_version(node: &JsonNode, allowed: &BTreeSet<String>) -> bool {
    match node.as_str() {
        Some(text) => is_valid_semver(text) || allowed.contains(text),
        None => false,
    }
}
