//! Global constants used throughout the plugin-checks codebase.
//!
//! File names, property names and default option values that several
//! modules agree on. Keeping them here makes the recognised manifest layout
//! discoverable in one place.

/// Name under which the rule reports its diagnostics.
pub const RULE_NAME: &str = "nx-plugin-checks";

/// Default generators manifest file name, relative to the project root.
pub const DEFAULT_GENERATORS_JSON: &str = "generators.json";

/// Default executors manifest file name, relative to the project root.
pub const DEFAULT_EXECUTORS_JSON: &str = "executors.json";

/// Default migrations manifest file name, relative to the project root.
pub const DEFAULT_MIGRATIONS_JSON: &str = "migrations.json";

/// Default package manifest file name, relative to the project root.
pub const DEFAULT_PACKAGE_JSON: &str = "package.json";

/// Non-semver version strings accepted unless configured otherwise.
pub const DEFAULT_ALLOWED_VERSION_STRINGS: [&str; 3] = ["*", "latest", "next"];

/// TypeScript configuration registered with the module loader.
pub const DEFAULT_TSCONFIG: &str = "tsconfig.base.json";

/// Optional workspace-level configuration file.
pub const CONFIG_FILE_NAME: &str = "plugin-checks.toml";

/// Environment variable that points at an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "PLUGIN_CHECKS_CONFIG";

/// Files whose presence marks a workspace root.
pub const WORKSPACE_MARKERS: [&str; 2] = ["nx.json", "workspace.json"];

/// Per-project configuration file that defines a project root.
pub const PROJECT_FILE_NAME: &str = "project.json";

/// Directories never descended into while discovering projects.
pub const IGNORED_DIRECTORIES: [&str; 5] = ["node_modules", ".git", "dist", "tmp", ".nx"];

/// Root keys of a generators or migrations collection file.
pub const GENERATOR_ROOT_KEYS: [&str; 2] = ["schematics", "generators"];

/// Root keys of an executors collection file.
pub const EXECUTOR_ROOT_KEYS: [&str; 2] = ["executors", "builders"];

/// Aliases for the implementation reference of an entry.
pub const IMPLEMENTATION_KEYS: [&str; 2] = ["implementation", "factory"];

/// `package.json` properties that may hold the migrations declaration.
pub const MIGRATION_DECLARATION_KEYS: [&str; 3] = ["nx-migrations", "ng-update", "migrations"];

/// Fallback substitution for a package group member without a `package` name.
pub const UNKNOWN_PACKAGE: &str = "unknown";

/// node-semver refuses version strings longer than this.
pub const MAX_VERSION_LENGTH: usize = 256;

/// Largest major, minor or patch number node-semver accepts
/// (`Number.MAX_SAFE_INTEGER`).
pub const MAX_VERSION_COMPONENT: u64 = 9_007_199_254_740_991;
