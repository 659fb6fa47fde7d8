//! Node-style module resolution over the filesystem.
//!
//! [`NodeModuleLoader`] follows the `require.resolve` algorithm for absolute
//! requests:
//!
//! 1. the path itself, if it is a file;
//! 2. the path with each known extension appended;
//! 3. if it is a directory: its `package.json` `main` (as a file, then as a
//!    directory index), then `index` with each known extension.
//!
//! Known extensions are `.js`, `.json` and `.node`. Registering the
//! TypeScript environment adds `.ts`, `.tsx`, `.mts` and `.cts`, and loads
//! `compilerOptions.paths` aliases from the workspace `tsconfig`. Aliases are
//! consulted for bare specifiers met while following re-exports, before the
//! usual `node_modules` lookup.

use anyhow::Result;
use serde_json::Value;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use super::exports::{ExportEntry, ExportIndex, ExportScanner, ExportShape};
use super::{LoadError, ModuleLoader, ResolveError};
use crate::utils::fs::{join_relative, normalize_path, read_json_file};

static BASE_EXTENSIONS: [&str; 3] = [".js", ".json", ".node"];
static TYPESCRIPT_EXTENSIONS: [&str; 4] = [".ts", ".tsx", ".mts", ".cts"];

/// One `compilerOptions.paths` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathAlias {
    pattern: String,
    targets: Vec<String>,
}

impl PathAlias {
    /// The part of `request` matched by `*`, or `""` for an exact match.
    fn capture<'a>(&self, request: &'a str) -> Option<&'a str> {
        match self.pattern.split_once('*') {
            Some((prefix, suffix)) => {
                if request.len() < prefix.len() + suffix.len() {
                    return None;
                }
                request.strip_prefix(prefix)?.strip_suffix(suffix)
            }
            None => (request == self.pattern).then_some(""),
        }
    }

    fn prefix_len(&self) -> usize {
        self.pattern.split('*').next().map_or(0, str::len)
    }
}

/// [`ModuleLoader`] implementing Node's resolution and a static export index.
#[derive(Debug, Clone)]
pub struct NodeModuleLoader {
    scanner: ExportScanner,
    typescript: bool,
    base_url: PathBuf,
    aliases: Vec<PathAlias>,
}

impl NodeModuleLoader {
    /// Creates a loader with only the plain JavaScript extensions enabled.
    ///
    /// # Errors
    ///
    /// Fails only if the export patterns cannot be compiled.
    pub fn new() -> Result<Self> {
        Ok(Self {
            scanner: ExportScanner::new()?,
            typescript: false,
            base_url: PathBuf::new(),
            aliases: Vec::new(),
        })
    }

    /// Whether TypeScript sources are resolvable.
    #[must_use]
    pub fn typescript_enabled(&self) -> bool {
        self.typescript
    }

    fn extensions(&self) -> impl Iterator<Item = &'static str> {
        let typescript: &'static [&'static str] = if self.typescript {
            &TYPESCRIPT_EXTENSIONS
        } else {
            &[]
        };
        BASE_EXTENSIONS.iter().chain(typescript.iter()).copied()
    }

    fn load_as_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        self.extensions().map(|ext| with_suffix(path, ext)).find(|candidate| candidate.is_file())
    }

    fn load_index(&self, dir: &Path) -> Option<PathBuf> {
        self.extensions().map(|ext| dir.join(format!("index{ext}"))).find(|candidate| candidate.is_file())
    }

    fn load_as_directory(&self, dir: &Path) -> Option<PathBuf> {
        if !dir.is_dir() {
            return None;
        }

        let manifest = dir.join("package.json");
        if manifest.is_file() {
            match read_json_file::<Value>(&manifest) {
                Ok(package) => {
                    if let Some(main) = package.get("main").and_then(Value::as_str) {
                        let main = join_relative(dir, main);
                        if let Some(found) = self.load_as_file(&main).or_else(|| self.load_index(&main)) {
                            return Some(found);
                        }
                    }
                }
                Err(e) => debug!("Ignoring unreadable {}: {e:#}", manifest.display()),
            }
        }

        self.load_index(dir)
    }

    fn resolve_path(&self, path: &Path) -> Option<PathBuf> {
        self.load_as_file(path).or_else(|| self.load_as_directory(path))
    }

    /// Resolves a request written inside the module living in `from_dir`.
    fn resolve_from(&self, from_dir: &Path, request: &str) -> Option<PathBuf> {
        if !is_bare(request) {
            let target = if request.starts_with('/') {
                normalize_path(Path::new(request))
            } else {
                normalize_path(&from_dir.join(request))
            };
            return self.resolve_path(&target);
        }

        if let Some(found) = self.resolve_alias(request) {
            return Some(found);
        }

        for dir in from_dir.ancestors() {
            if dir.file_name().is_some_and(|n| n == "node_modules") {
                continue;
            }
            let candidate = dir.join("node_modules").join(request);
            if let Some(found) = self.resolve_path(&candidate) {
                return Some(found);
            }
        }
        None
    }

    fn resolve_alias(&self, request: &str) -> Option<PathBuf> {
        let mut matches: Vec<(&PathAlias, &str)> =
            self.aliases.iter().filter_map(|a| a.capture(request).map(|c| (a, c))).collect();
        matches.sort_by_key(|(alias, _)| std::cmp::Reverse(alias.prefix_len()));

        for (alias, captured) in matches {
            for target in &alias.targets {
                let target = target.replacen('*', captured, 1);
                let candidate = normalize_path(&self.base_url.join(target));
                if let Some(found) = self.resolve_path(&candidate) {
                    trace!("Alias '{}' resolved '{request}' to {}", alias.pattern, found.display());
                    return Some(found);
                }
            }
        }
        None
    }

    fn index_module(&self, module: &Path) -> Result<ExportIndex, LoadError> {
        let extension = module.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let unsupported = |reason: &str| LoadError::Unsupported {
            path: module.display().to_string(),
            reason: reason.to_string(),
        };

        match extension {
            "node" => Err(unsupported("native addons cannot be inspected")),
            "ts" | "tsx" | "mts" | "cts" if !self.typescript => {
                Err(unsupported("TypeScript modules need a registered TypeScript environment"))
            }
            "json" => {
                let text = read_module(module)?;
                let value: Value = serde_json::from_str(&text).map_err(|e| LoadError::Malformed {
                    path: module.display().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(ExportIndex::from_json(&value))
            }
            _ => Ok(self.scanner.scan(&read_module(module)?)),
        }
    }

    /// Resolves a re-export target. `Ok(None)` means a bare specifier that
    /// could not be found; its exports are unknown rather than broken.
    fn resolve_reexport(&self, module: &Path, request: &str) -> Result<Option<PathBuf>, LoadError> {
        let dir = module.parent().unwrap_or(Path::new(""));
        match self.resolve_from(dir, request) {
            Some(found) => Ok(Some(found)),
            None if is_bare(request) => {
                debug!("Cannot follow re-export '{request}' from {}", module.display());
                Ok(None)
            }
            None => Err(LoadError::BrokenReExport {
                path: module.display().to_string(),
                request: request.to_string(),
            }),
        }
    }

    fn find_export(
        &self,
        module: &Path,
        name: &str,
        visited: &mut HashSet<(PathBuf, String)>,
    ) -> Result<Option<ExportShape>, LoadError> {
        if !visited.insert((module.to_path_buf(), name.to_string())) {
            return Ok(None);
        }

        let index = self.index_module(module)?;
        match index.entry(name) {
            Some(ExportEntry::Local(shape)) => return Ok(Some(*shape)),
            Some(ExportEntry::ReExport {
                request,
                name: original,
            }) => {
                return match self.resolve_reexport(module, request)? {
                    Some(target) => self.find_export(&target, original, visited),
                    None => Ok(Some(ExportShape::Opaque)),
                };
            }
            None => {}
        }

        if index.is_dynamic() {
            return Ok(Some(ExportShape::Opaque));
        }
        // `export *` never forwards the default export.
        if name == "default" {
            return Ok(None);
        }

        let mut unknown = false;
        for request in index.star_requests() {
            match self.resolve_reexport(module, request)? {
                Some(target) => {
                    if let Some(shape) = self.find_export(&target, name, visited)? {
                        return Ok(Some(shape));
                    }
                }
                None => unknown = true,
            }
        }

        Ok(unknown.then_some(ExportShape::Opaque))
    }
}

impl ModuleLoader for NodeModuleLoader {
    fn register_environment(&mut self, workspace_root: &Path, tsconfig: &Path) {
        self.typescript = true;
        debug!(
            "Registered TypeScript resolution for {} using {}",
            workspace_root.display(),
            tsconfig.display()
        );

        if !tsconfig.is_file() {
            debug!("No TypeScript config at {}; path aliases disabled", tsconfig.display());
            return;
        }
        match load_path_aliases(tsconfig) {
            Ok((base_url, aliases)) => {
                debug!("Loaded {} path alias(es) from {}", aliases.len(), tsconfig.display());
                self.base_url = base_url;
                self.aliases = aliases;
            }
            Err(e) => warn!("Ignoring path aliases in {}: {e:#}", tsconfig.display()),
        }
    }

    fn resolve(&self, request: &Path) -> Result<PathBuf, ResolveError> {
        let request = normalize_path(request);
        match self.resolve_path(&request) {
            Some(found) => {
                trace!("Resolved {} to {}", request.display(), found.display());
                Ok(found)
            }
            None => {
                debug!("Cannot resolve {}", request.display());
                Err(ResolveError::NotFound {
                    request: request.display().to_string(),
                })
            }
        }
    }

    fn inspect_export(&self, module: &Path, name: &str) -> Result<Option<ExportShape>, LoadError> {
        let mut visited = HashSet::new();
        let shape = self.find_export(module, name, &mut visited)?;
        trace!("Export '{name}' of {}: {shape:?}", module.display());
        Ok(shape)
    }
}

fn is_bare(request: &str) -> bool {
    !(request.starts_with("./")
        || request.starts_with("../")
        || request.starts_with('/')
        || request == "."
        || request == "..")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn read_module(module: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(module).map_err(|e| LoadError::Unreadable {
        path: module.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_path_aliases(tsconfig: &Path) -> Result<(PathBuf, Vec<PathAlias>)> {
    let config: Value = read_json_file(tsconfig)?;
    let config_dir = tsconfig.parent().unwrap_or(Path::new(""));
    let options = config.get("compilerOptions");

    let base_url = options
        .and_then(|o| o.get("baseUrl"))
        .and_then(Value::as_str)
        .map_or_else(|| config_dir.to_path_buf(), |base| join_relative(config_dir, base));

    let aliases = options
        .and_then(|o| o.get("paths"))
        .and_then(Value::as_object)
        .map(|paths| {
            paths
                .iter()
                .map(|(pattern, targets)| PathAlias {
                    pattern: pattern.clone(),
                    targets: targets
                        .as_array()
                        .map(|t| t.iter().filter_map(Value::as_str).map(str::to_string).collect())
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok((base_url, aliases))
}
