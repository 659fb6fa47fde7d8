//! The per-session entry point of the rule.
//!
//! A [`PluginChecks`] session owns the scope resolver and the module loader.
//! Each visited document goes through the same steps:
//!
//! 1. the document root must be an object;
//! 2. the file must be one of its project's manifests ([`ScopeResolver`]);
//! 3. the module-resolution environment is registered, once per session;
//! 4. the manifest is dispatched to the collection or package checks.
//!
//! Files failing step 1 or 2 produce no diagnostics and cause no filesystem
//! resolution.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::collection::check_collection_file;
use super::package_group::check_package_json;
use super::{DiagnosticSink, RuleContext};
use crate::core::PluginCheckError;
use crate::json::{JsonNode, parse_document};
use crate::resolver::ModuleLoader;
use crate::utils::fs::normalize_path;
use crate::workspace::{ManifestFile, ScopeResolver};

/// What happened to one visited document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Not a manifest, or not an object document.
    Skipped,
    /// Validated as the given manifest kind.
    Checked(ManifestFile),
}

/// A validation session over one workspace.
pub struct PluginChecks<L: ModuleLoader> {
    scope: ScopeResolver,
    tsconfig: PathBuf,
    loader: L,
    environment_registered: bool,
}

impl<L: ModuleLoader> PluginChecks<L> {
    /// Creates a session. `tsconfig` is handed to the loader on the first
    /// in-scope file.
    pub fn new(scope: ScopeResolver, tsconfig: impl Into<PathBuf>, loader: L) -> Self {
        Self {
            scope,
            tsconfig: tsconfig.into(),
            loader,
            environment_registered: false,
        }
    }

    /// The scope resolver of this session.
    pub fn scope(&self) -> &ScopeResolver {
        &self.scope
    }

    /// The module loader of this session.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Whether the resolution environment has been registered.
    pub fn environment_registered(&self) -> bool {
        self.environment_registered
    }

    fn ensure_environment(&mut self) {
        if self.environment_registered {
            return;
        }
        let workspace_root = self.scope.graph().workspace_root().to_path_buf();
        debug!("Registering module resolution for {}", workspace_root.display());
        self.loader.register_environment(&workspace_root, &self.tsconfig);
        self.environment_registered = true;
    }

    /// Validates the parsed document of `file` (an absolute path).
    pub fn check_document(
        &mut self,
        file: &Path,
        root: &JsonNode,
        sink: &mut dyn DiagnosticSink,
    ) -> CheckOutcome {
        if !root.is_object() {
            trace!("{} has a non-object root; skipping", file.display());
            return CheckOutcome::Skipped;
        }

        let file = normalize_path(file);
        let Some(scope) = self.scope.resolve(&file) else {
            return CheckOutcome::Skipped;
        };
        self.ensure_environment();

        debug!("Checking {} as {:?} of '{}'", file.display(), scope.file, scope.project);
        let manifest_dir = file.parent().unwrap_or(Path::new(""));
        let mut ctx = RuleContext::new(manifest_dir, &scope.options, &self.loader, sink);
        match scope.file {
            ManifestFile::Collection(kind) => check_collection_file(&mut ctx, root, kind),
            ManifestFile::PackageJson => check_package_json(&mut ctx, root),
        }

        CheckOutcome::Checked(scope.file)
    }

    /// Parses `text` as the content of `file` and validates it.
    ///
    /// Out-of-scope files are skipped before parsing, so they may hold
    /// anything.
    ///
    /// # Errors
    ///
    /// [`PluginCheckError::DocumentParseError`] when an in-scope file is not
    /// valid JSON.
    pub fn check_source(
        &mut self,
        file: &Path,
        text: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<CheckOutcome, PluginCheckError> {
        if self.scope.resolve(file).is_none() {
            return Ok(CheckOutcome::Skipped);
        }
        let root = parse_document(text).map_err(|e| PluginCheckError::DocumentParseError {
            file: file.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.check_document(file, &root, sink))
    }
}
