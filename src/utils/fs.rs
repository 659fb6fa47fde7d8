//! File system helpers used by the resolver, the project graph and the CLI.
//!
//! Everything here is synchronous `std::fs`; the async CLI layer uses
//! `tokio::fs` directly for the files it visits.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::core::PluginCheckError;

/// Normalizes a path by resolving `.` and `..` components lexically.
///
/// The filesystem is not consulted, so symbolic links are not followed.
///
/// # Examples
///
/// ```rust
/// use plugin_checks::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// let path = Path::new("/foo/./bar/../baz");
/// assert_eq!(normalize_path(path), PathBuf::from("/foo/baz"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {} // Skip .
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `..` never climbs above the root or a drive prefix.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                // A relative path keeps its leading `..`.
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Joins `reference` onto `base` the way Node's `path.join` does.
///
/// Unlike [`Path::join`], an absolute `reference` does not replace `base`:
/// leading separators are dropped so the result always stays under `base`
/// before `..` components are applied.
///
/// # Examples
///
/// ```rust
/// use plugin_checks::utils::fs::join_relative;
/// use std::path::{Path, PathBuf};
///
/// let base = Path::new("/ws/libs/plugin");
/// assert_eq!(join_relative(base, "./schema.json"), PathBuf::from("/ws/libs/plugin/schema.json"));
/// assert_eq!(join_relative(base, "/schema.json"), PathBuf::from("/ws/libs/plugin/schema.json"));
/// assert_eq!(join_relative(base, "../other/x.js"), PathBuf::from("/ws/libs/other/x.js"));
/// ```
#[must_use]
pub fn join_relative(base: &Path, reference: &str) -> PathBuf {
    let trimmed = reference.trim_start_matches(['/', '\\']);
    normalize_path(&base.join(trimmed))
}

/// Makes `path` absolute against `cwd` and normalizes it.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&cwd.join(path))
    }
}

/// Reads a UTF-8 text file.
///
/// # Errors
/// Returns an error with context if the file cannot be read
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Reads and parses a JSON file; comments and trailing commas are allowed.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn read_json_file<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = read_text_file(path)?;
    crate::json::from_jsonc(&content)
        .with_context(|| format!("Failed to parse JSON from file: {}", path.display()))
}

/// Finds the workspace root by searching up from `start`.
///
/// The first directory holding any of
/// [`WORKSPACE_MARKERS`](crate::constants::WORKSPACE_MARKERS) wins.
///
/// # Errors
///
/// Returns [`PluginCheckError::WorkspaceNotFound`] when the filesystem root is
/// reached without a match.
pub fn find_workspace_root(start: &Path) -> Result<PathBuf> {
    let mut current = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    loop {
        if crate::constants::WORKSPACE_MARKERS.iter().any(|marker| current.join(marker).is_file()) {
            return Ok(current);
        }

        if !current.pop() {
            return Err(PluginCheckError::WorkspaceNotFound {
                start: start.display().to_string(),
            }
            .into());
        }
    }
}
