//! Throwaway workspaces for tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::workspace::{ProjectGraph, ProjectNode};

/// Fluent builder for a [`TestWorkspace`].
pub struct TestWorkspaceBuilder {
    temp_dir: TempDir,
    projects: Vec<(String, String)>,
    files: Vec<(String, String)>,
    with_nx_json: bool,
}

impl TestWorkspaceBuilder {
    /// Starts an empty workspace in a fresh temporary directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            projects: Vec::new(),
            files: Vec::new(),
            with_nx_json: true,
        })
    }

    /// Adds a project with a `project.json` at `root`.
    pub fn with_project(mut self, name: &str, root: &str) -> Self {
        self.projects.push((name.to_string(), root.to_string()));
        self
    }

    /// Adds a file relative to the workspace root.
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Leaves out the `nx.json` marker.
    pub fn without_nx_json(mut self) -> Self {
        self.with_nx_json = false;
        self
    }

    /// Writes everything to disk.
    pub fn build(self) -> Result<TestWorkspace> {
        // Canonical so paths compare equal to what discovery reports.
        let root = self.temp_dir.path().canonicalize()?;
        let mut workspace = TestWorkspace {
            _temp_dir: self.temp_dir,
            root,
            projects: Vec::new(),
        };

        if self.with_nx_json {
            workspace.write_file("nx.json", "{}")?;
        }

        for (name, root) in &self.projects {
            let definition = serde_json::json!({ "name": name, "root": root });
            let file = if root.is_empty() || root == "." {
                "project.json".to_string()
            } else {
                format!("{root}/project.json")
            };
            workspace.write_file(&file, &serde_json::to_string_pretty(&definition)?)?;
            workspace.projects.push(ProjectNode::new(name.clone(), root.clone()));
        }

        for (path, content) in &self.files {
            workspace.write_file(path, content)?;
        }

        Ok(workspace)
    }
}

/// A workspace on disk that is removed when dropped.
pub struct TestWorkspace {
    _temp_dir: TempDir,
    root: PathBuf,
    projects: Vec<ProjectNode>,
}

impl TestWorkspace {
    /// Starts a builder.
    pub fn builder() -> Result<TestWorkspaceBuilder> {
        TestWorkspaceBuilder::new()
    }

    /// Absolute workspace root.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the workspace.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// A graph of the projects added through the builder.
    pub fn graph(&self) -> ProjectGraph {
        ProjectGraph::new(&self.root, self.projects.clone())
    }

    /// Whether `relative` exists.
    pub fn file_exists(&self, relative: impl AsRef<Path>) -> bool {
        self.root.join(relative).exists()
    }

    /// Reads `relative` as text.
    pub fn read_file(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
