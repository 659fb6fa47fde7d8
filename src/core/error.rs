//! Error handling for plugin-checks
//!
//! Two kinds of failure exist in this crate and they are kept strictly apart:
//!
//! 1. **Findings about the input** (a missing `schema`, an unresolvable
//!    implementation, a bad version string) are *diagnostics*. They are reported
//!    through [`crate::rules::DiagnosticSink`] and never surface as errors.
//! 2. **Failures of the tool itself** (no workspace root, unreadable config,
//!    a visited manifest that is not JSON) are [`PluginCheckError`] values,
//!    propagated with `anyhow` and shown to the user by [`user_friendly_error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use plugin_checks::core::{PluginCheckError, user_friendly_error};
//!
//! fn locate() -> anyhow::Result<()> {
//!     Err(PluginCheckError::WorkspaceNotFound {
//!         start: "/tmp".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = locate() {
//!     let ctx = user_friendly_error(e);
//!     ctx.display(); // colored error with a suggestion
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for plugin-checks operations.
#[derive(Error, Debug)]
pub enum PluginCheckError {
    /// No `nx.json` / `workspace.json` was found walking up from `start`.
    #[error("No workspace root found from {start}")]
    WorkspaceNotFound {
        /// Directory the upward search started from
        start: String,
    },

    /// A visited manifest file could not be read.
    #[error("Cannot read {file}")]
    FileReadError {
        /// The file that failed to read
        file: String,
        /// Underlying I/O message
        reason: String,
    },

    /// A visited manifest is not valid JSON.
    #[error("Invalid JSON in {file}: {reason}")]
    DocumentParseError {
        /// The file that failed to parse
        file: String,
        /// Parser message including line and column
        reason: String,
    },

    /// The configuration file exists but is unusable.
    #[error("Invalid configuration in {file}: {reason}")]
    ConfigParseError {
        /// Path of the configuration file
        file: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// A `project.json` or `workspace.json` could not be interpreted.
    #[error("Invalid project definition in {file}: {reason}")]
    ProjectDefinitionError {
        /// Path of the offending file
        file: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// An `exclude` entry is not a valid glob.
    #[error("Invalid exclude pattern '{pattern}'")]
    InvalidExcludePattern {
        /// The rejected pattern
        pattern: String,
    },

    /// Checking finished but reported problems or per-file errors.
    #[error("Found {problems} problem(s) and {errors} error(s)")]
    ChecksFailed {
        /// Number of diagnostics reported
        problems: usize,
        /// Number of files that could not be checked
        errors: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl PluginCheckError {
    fn duplicate(&self) -> Self {
        match self {
            Self::WorkspaceNotFound {
                start,
            } => Self::WorkspaceNotFound {
                start: start.clone(),
            },
            Self::FileReadError {
                file,
                reason,
            } => Self::FileReadError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::DocumentParseError {
                file,
                reason,
            } => Self::DocumentParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ChecksFailed {
                problems,
                errors,
            } => Self::ChecksFailed {
                problems: *problems,
                errors: *errors,
            },
            Self::ProjectDefinitionError {
                file,
                reason,
            } => Self::ProjectDefinitionError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::InvalidExcludePattern {
                pattern,
            } => Self::InvalidExcludePattern {
                pattern: pattern.clone(),
            },
            // Foreign errors are not Clone; keep their message.
            other => Self::Other {
                message: other.to_string(),
            },
        }
    }
}

/// An error paired with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PluginCheckError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: PluginCheckError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for CLI display.
///
/// Recognises [`PluginCheckError`] variants, I/O errors and TOML errors and
/// attaches a suggestion to each; anything else is shown with its full cause
/// chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(check_error) = error.downcast_ref::<PluginCheckError>() {
        return create_error_context(check_error.duplicate());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(PluginCheckError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership and permissions of the workspace");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(PluginCheckError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(PluginCheckError::ConfigParseError {
            file: crate::constants::CONFIG_FILE_NAME.to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the configuration file");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(PluginCheckError::Other {
        message,
    })
}

fn create_error_context(error: PluginCheckError) -> ErrorContext {
    let suggestion = match &error {
        PluginCheckError::WorkspaceNotFound {
            ..
        } => Some("Run from inside the workspace or pass --workspace-root"),
        PluginCheckError::DocumentParseError {
            ..
        } => Some("Fix the JSON syntax; comments and trailing commas are not accepted"),
        PluginCheckError::ConfigParseError {
            ..
        } => Some(
            "Option keys are generatorsJson, executorsJson, migrationsJson, packageJson, allowedVersionStrings, tsconfig and exclude",
        ),
        PluginCheckError::ProjectDefinitionError {
            ..
        } => Some("project.json and workspace.json must be JSON objects"),
        PluginCheckError::InvalidExcludePattern {
            ..
        } => Some("Exclude entries use glob syntax, e.g. \"apps/legacy/**\""),
        PluginCheckError::ChecksFailed {
            ..
        } => Some("Run `plugin-checks rules` to see what each message means"),
        _ => None,
    };
    let details = match &error {
        PluginCheckError::WorkspaceNotFound {
            ..
        } => Some(
            "The workspace root is the nearest directory containing nx.json or workspace.json"
                .to_string(),
        ),
        PluginCheckError::FileReadError {
            reason,
            ..
        } => Some(reason.clone()),
        _ => None,
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    ctx
}
