//! Path presentation helpers.

use std::path::Path;

/// Converts a path to a forward-slash string for output.
///
/// Windows extended-length prefixes added by `canonicalize()` are stripped so
/// reports look the same on every platform.
#[must_use]
pub fn normalize_path_for_storage<P: AsRef<Path>>(path: P) -> String {
    let path_str = path.as_ref().to_string_lossy();

    let cleaned = if let Some(stripped) = path_str.strip_prefix(r"\\?\UNC\") {
        format!("//{}", stripped)
    } else if let Some(stripped) = path_str.strip_prefix(r"\\?\") {
        stripped.to_string()
    } else {
        path_str.to_string()
    };

    cleaned.replace('\\', "/")
}

/// Displays `path` relative to `base` when it lies inside it.
#[must_use]
pub fn display_relative(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) if !rel.as_os_str().is_empty() => normalize_path_for_storage(rel),
        _ => normalize_path_for_storage(path),
    }
}
