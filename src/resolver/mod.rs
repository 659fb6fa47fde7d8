//! Implementation module resolution and export inspection.
//!
//! A manifest entry names the code behind it with an *implementation
//! reference*: `"./src/generators/app/generator"` or
//! `"./src/generators/app/generator#appGenerator"`. Checking such a reference
//! takes two capabilities, captured by the [`ModuleLoader`] trait:
//!
//! - **resolve**: turn the joined path into an existing module file, using the
//!   host's module resolution rules;
//! - **inspect**: load the module and report whether a named export exists and
//!   whether it can be called.
//!
//! Nothing is ever executed. [`NodeModuleLoader`] implements Node's
//! `require.resolve` algorithm over the filesystem and answers export questions
//! from a static [`ExportIndex`] built from the module source.
//!
//! Failures are typed: [`ResolveError`] when no file can be found,
//! [`LoadError`] when a file is found but its exports cannot be read. The rule
//! layer maps them to distinct diagnostics.

pub mod exports;
pub mod node;

pub use exports::{ExportIndex, ExportScanner, ExportShape};
pub use node::NodeModuleLoader;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::fs::join_relative;

/// A module request that could not be resolved to a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No candidate file or directory matched.
    #[error("Cannot find module '{request}'")]
    NotFound {
        /// The request as given to the resolver
        request: String,
    },
}

/// A resolved module whose exports could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The file could not be read as text.
    #[error("Cannot read module {path}: {reason}")]
    Unreadable {
        /// Module path
        path: String,
        /// Underlying I/O message
        reason: String,
    },

    /// The module content is malformed for its type.
    #[error("Malformed module {path}: {reason}")]
    Malformed {
        /// Module path
        path: String,
        /// What went wrong
        reason: String,
    },

    /// The module kind cannot be inspected statically.
    #[error("Cannot inspect module {path}: {reason}")]
    Unsupported {
        /// Module path
        path: String,
        /// Why it is unsupported
        reason: String,
    },

    /// A re-exported module could not be resolved while loading.
    #[error("Module {path} re-exports unresolvable '{request}'")]
    BrokenReExport {
        /// The module containing the re-export
        path: String,
        /// The request that failed
        request: String,
    },
}

/// Resolution and export inspection for implementation modules.
pub trait ModuleLoader {
    /// Prepares resolution for the workspace, e.g. enabling TypeScript
    /// sources and `tsconfig` path aliases. Called at most once per session.
    fn register_environment(&mut self, workspace_root: &Path, tsconfig: &Path);

    /// Resolves an absolute module request to an existing file.
    ///
    /// # Errors
    ///
    /// [`ResolveError::NotFound`] when no file matches.
    fn resolve(&self, request: &Path) -> Result<PathBuf, ResolveError>;

    /// Looks up export `name` in the resolved module at `module`.
    ///
    /// Returns `Ok(None)` when the module loads but has no such export.
    ///
    /// # Errors
    ///
    /// A [`LoadError`] when the module (or something it re-exports) cannot be
    /// loaded.
    fn inspect_export(&self, module: &Path, name: &str) -> Result<Option<ExportShape>, LoadError>;
}

/// A parsed `path` or `path#exportName` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationReference {
    /// The module request joined onto the manifest directory.
    pub module_path: PathBuf,
    /// The export to look up; `None` when absent or empty.
    pub export_name: Option<String>,
}

impl ImplementationReference {
    /// Splits `raw` on its first `#` and anchors the path at `manifest_dir`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use plugin_checks::resolver::ImplementationReference;
    /// use std::path::{Path, PathBuf};
    ///
    /// let r = ImplementationReference::parse("./impl#createGenerator", Path::new("/ws/p"));
    /// assert_eq!(r.module_path, PathBuf::from("/ws/p/impl"));
    /// assert_eq!(r.export_name.as_deref(), Some("createGenerator"));
    ///
    /// let r = ImplementationReference::parse("./impl#", Path::new("/ws/p"));
    /// assert_eq!(r.export_name, None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str, manifest_dir: &Path) -> Self {
        let (path, export) = match raw.split_once('#') {
            Some((path, export)) => (path, Some(export)),
            None => (raw, None),
        };

        Self {
            module_path: join_relative(manifest_dir, path),
            export_name: export.filter(|e| !e.is_empty()).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_first_hash_only() {
        let r = ImplementationReference::parse("./a#b#c", Path::new("/ws"));
        assert_eq!(r.module_path, PathBuf::from("/ws/a"));
        assert_eq!(r.export_name.as_deref(), Some("b#c"));
    }

    #[test]
    fn test_parse_without_export() {
        let r = ImplementationReference::parse("../shared/impl", Path::new("/ws/libs/p"));
        assert_eq!(r.module_path, PathBuf::from("/ws/libs/shared/impl"));
        assert_eq!(r.export_name, None);
    }

    #[test]
    fn test_parse_with_excess_parents_stays_absolute() {
        let r = ImplementationReference::parse("../../../../../../../impl#gen", Path::new("/ws/libs/p"));
        assert_eq!(r.module_path, PathBuf::from("/impl"));
        assert!(r.module_path.is_absolute());
    }
}
