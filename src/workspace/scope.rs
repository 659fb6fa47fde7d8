//! Deciding whether a visited file is a plugin manifest.
//!
//! A file is in scope when it is exactly one of the four configured manifest
//! paths of the project that owns it. Everything else is silently ignored.

use std::path::{Path, PathBuf};
use tracing::trace;

use super::{ProjectGraph, ProjectNode};
use crate::config::{RuleOptions, ValidationOptions};
use crate::rules::ManifestKind;
use crate::utils::fs::normalize_path;

/// Which kind of manifest a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFile {
    /// A generators, migrations or executors collection.
    Collection(ManifestKind),
    /// The project's `package.json`.
    PackageJson,
}

/// A file that matched one of its project's manifest paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestScope {
    /// Owning project name.
    pub project: String,
    /// Which manifest the file is.
    pub file: ManifestFile,
    /// Options normalised for the owning project.
    pub options: ValidationOptions,
}

/// Maps visited files to manifest kinds.
#[derive(Debug, Clone)]
pub struct ScopeResolver {
    graph: ProjectGraph,
    options: RuleOptions,
}

impl ScopeResolver {
    /// Creates a resolver for `graph` with user `options`.
    #[must_use]
    pub fn new(graph: ProjectGraph, options: RuleOptions) -> Self {
        Self {
            graph,
            options,
        }
    }

    /// The project graph.
    #[must_use]
    pub fn graph(&self) -> &ProjectGraph {
        &self.graph
    }

    /// Options normalised for `project`.
    #[must_use]
    pub fn options_for(&self, project: &ProjectNode) -> ValidationOptions {
        self.options.normalize(&self.graph.project_dir(project))
    }

    /// Classifies `file` (an absolute path).
    ///
    /// Matching order when several options name the same file: generators,
    /// migrations, executors, package.
    #[must_use]
    pub fn resolve(&self, file: &Path) -> Option<ManifestScope> {
        let file = normalize_path(file);
        let Some(project) = self.graph.find_owning_project(&file) else {
            trace!("{} belongs to no project", file.display());
            return None;
        };
        let options = self.options_for(project);

        let candidates = [
            (&options.generators_file, ManifestFile::Collection(ManifestKind::Generator)),
            (&options.migrations_file, ManifestFile::Collection(ManifestKind::Migration)),
            (&options.executors_file, ManifestFile::Collection(ManifestKind::Executor)),
            (&options.package_file, ManifestFile::PackageJson),
        ];
        let kind = candidates
            .into_iter()
            .find(|(path, _)| path.as_deref() == Some(file.as_path()))
            .map(|(_, kind)| kind);

        match kind {
            Some(file_kind) => {
                trace!("{} is a {:?} of project '{}'", file.display(), file_kind, project.name);
                Some(ManifestScope {
                    project: project.name.clone(),
                    file: file_kind,
                    options,
                })
            }
            None => {
                trace!("{} is not a manifest of project '{}'", file.display(), project.name);
                None
            }
        }
    }

    /// Every enabled manifest path of every project, whether or not it exists.
    #[must_use]
    pub fn manifest_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for project in self.graph.projects() {
            let options = self.options_for(project);
            for path in [
                options.generators_file,
                options.migrations_file,
                options.executors_file,
                options.package_file,
            ]
            .into_iter()
            .flatten()
            {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }
        paths
    }
}
