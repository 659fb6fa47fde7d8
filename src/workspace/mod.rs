//! Workspace project graph.
//!
//! The validator only needs one thing from the workspace: for a given file,
//! which project owns it and where that project's root is. [`ProjectGraph`]
//! answers that question. It is usually built by [`ProjectGraph::discover`],
//! which finds projects the way an Nx workspace declares them:
//!
//! - every directory containing a `project.json` is a project, named after the
//!   file's `name` field or, failing that, the directory name;
//! - a root `workspace.json` with a `projects` map (`name → "root"` or
//!   `name → { "root": ... }`) adds or overrides entries.
//!
//! Discovery skips `node_modules`, `.git`, `dist`, `tmp`, `.nx` and anything
//! matching a configured `exclude` glob.
//!
//! # Examples
//!
//! ```rust
//! use plugin_checks::workspace::{ProjectGraph, ProjectNode};
//! use std::path::Path;
//!
//! let graph = ProjectGraph::new(
//!     "/ws",
//!     vec![
//!         ProjectNode::new("workspace", ""),
//!         ProjectNode::new("my-plugin", "libs/my-plugin"),
//!     ],
//! );
//!
//! let owner = graph.find_owning_project(Path::new("/ws/libs/my-plugin/generators.json"));
//! assert_eq!(owner.map(|p| p.name.as_str()), Some("my-plugin"));
//!
//! let owner = graph.find_owning_project(Path::new("/ws/tools/script.json"));
//! assert_eq!(owner.map(|p| p.name.as_str()), Some("workspace"));
//! ```

pub mod scope;

pub use scope::{ManifestFile, ManifestScope, ScopeResolver};

use anyhow::{Context, Result};
use glob::Pattern;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::constants::{IGNORED_DIRECTORIES, PROJECT_FILE_NAME};
use crate::core::PluginCheckError;
use crate::utils::fs::{normalize_path, read_json_file};
use crate::utils::normalize_path_for_storage;

/// A project of the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    /// Project name.
    pub name: String,
    /// Root directory relative to the workspace root (empty for a root project).
    pub root: PathBuf,
}

impl ProjectNode {
    /// Creates a project node; `root` is relative to the workspace root.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let root = normalize_path(&root.into());
        Self {
            name: name.into(),
            root,
        }
    }
}

/// All projects of one workspace.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    workspace_root: PathBuf,
    projects: Vec<ProjectNode>,
}

impl ProjectGraph {
    /// Builds a graph from known projects.
    pub fn new(workspace_root: impl Into<PathBuf>, projects: Vec<ProjectNode>) -> Self {
        Self {
            workspace_root: normalize_path(&workspace_root.into()),
            projects,
        }
    }

    /// Discovers projects under `workspace_root`.
    ///
    /// # Errors
    ///
    /// Fails when an `exclude` entry is not a valid glob, or when a
    /// `project.json` / `workspace.json` is unreadable or not an object.
    pub fn discover(workspace_root: &Path, exclude: &[String]) -> Result<Self> {
        let patterns = exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|_| PluginCheckError::InvalidExcludePattern {
                    pattern: p.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_name: BTreeMap<String, PathBuf> = BTreeMap::new();

        let walker = WalkDir::new(workspace_root).follow_links(false).into_iter().filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && IGNORED_DIRECTORIES.contains(&name.as_ref()) {
                return false;
            }
            let rel = e.path().strip_prefix(workspace_root).unwrap_or(e.path());
            let rel = normalize_path_for_storage(rel);
            !patterns.iter().any(|p| p.matches(&rel))
        });

        for entry in walker {
            let entry = entry.with_context(|| {
                format!("Failed to walk workspace {}", workspace_root.display())
            })?;
            if !entry.file_type().is_file() || entry.file_name() != PROJECT_FILE_NAME {
                continue;
            }

            let project_dir = entry.path().parent().unwrap_or(workspace_root);
            let root = project_dir.strip_prefix(workspace_root).unwrap_or(Path::new("")).to_path_buf();
            let definition: Value = read_json_file(entry.path())?;
            let name = match &definition {
                Value::Object(map) => map
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_name(&root, workspace_root)),
                _ => {
                    return Err(PluginCheckError::ProjectDefinitionError {
                        file: entry.path().display().to_string(),
                        reason: "expected a JSON object".to_string(),
                    }
                    .into());
                }
            };

            trace!("Found project '{}' at '{}'", name, root.display());
            by_name.insert(name, root);
        }

        let workspace_json = workspace_root.join("workspace.json");
        if workspace_json.is_file() {
            for (name, root) in read_workspace_json(&workspace_json)? {
                by_name.insert(name, root);
            }
        }

        let projects: Vec<ProjectNode> =
            by_name.into_iter().map(|(name, root)| ProjectNode::new(name, root)).collect();
        debug!("Discovered {} project(s) in {}", projects.len(), workspace_root.display());

        Ok(Self::new(workspace_root, projects))
    }

    /// Absolute workspace root.
    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// All projects, in name order when discovered.
    #[must_use]
    pub fn projects(&self) -> &[ProjectNode] {
        &self.projects
    }

    /// Absolute root directory of `project`.
    #[must_use]
    pub fn project_dir(&self, project: &ProjectNode) -> PathBuf {
        normalize_path(&self.workspace_root.join(&project.root))
    }

    /// The project whose root is the longest prefix of `file`.
    ///
    /// `file` must be absolute. Files outside the workspace have no owner.
    #[must_use]
    pub fn find_owning_project(&self, file: &Path) -> Option<&ProjectNode> {
        let file = normalize_path(file);
        let relative = file.strip_prefix(&self.workspace_root).ok()?;

        self.projects
            .iter()
            .filter(|p| relative.starts_with(&p.root))
            .max_by_key(|p| p.root.components().count())
    }
}

fn fallback_name(root: &Path, workspace_root: &Path) -> String {
    root.file_name()
        .or_else(|| workspace_root.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string())
}

fn read_workspace_json(path: &Path) -> Result<Vec<(String, PathBuf)>> {
    let definition: Value = read_json_file(path)?;
    let invalid = |reason: &str| PluginCheckError::ProjectDefinitionError {
        file: path.display().to_string(),
        reason: reason.to_string(),
    };

    let Value::Object(map) = definition else {
        return Err(invalid("expected a JSON object").into());
    };
    let Some(projects) = map.get("projects") else {
        return Ok(Vec::new());
    };
    let Value::Object(projects) = projects else {
        return Err(invalid("`projects` must be an object").into());
    };

    let mut out = Vec::new();
    for (name, entry) in projects {
        let root = match entry {
            Value::String(root) => root.as_str(),
            Value::Object(config) => match config.get("root").and_then(Value::as_str) {
                Some(root) => root,
                None => return Err(invalid(&format!("project '{name}' has no `root`")).into()),
            },
            _ => return Err(invalid(&format!("project '{name}' must be a string or object")).into()),
        };
        out.push((name.clone(), PathBuf::from(root)));
    }
    Ok(out)
}
