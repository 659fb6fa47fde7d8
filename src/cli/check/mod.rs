//! Validate plugin manifests.
//!
//! Without file arguments every enabled manifest of every discovered project
//! is checked, skipping the ones that do not exist. Named files are checked
//! only when they are one of their project's manifests; anything else is
//! counted as skipped.
//!
//! # Examples
//!
//! ```bash
//! # Every manifest in the workspace
//! plugin-checks check
//!
//! # One project's generators, with a custom file name
//! plugin-checks check libs/my-plugin/collection.json --generators-json collection.json
//!
//! # JSON report for CI
//! plugin-checks check --format json
//! ```
//!
//! # Output Formats
//!
//! ## Text
//!
//! ```text
//! libs/my-plugin/generators.json
//!   /generators/app/implementation  app: Unable to find export app in implementation module  nx-plugin-checks/invalidImplementationModule
//!
//! ✗ 1 problem in 1 of 3 checked files
//! ```
//!
//! ## JSON
//!
//! ```json
//! {
//!   "valid": false,
//!   "filesChecked": 3,
//!   "filesSkipped": 0,
//!   "diagnostics": [
//!     {
//!       "file": "libs/my-plugin/generators.json",
//!       "rule": "nx-plugin-checks",
//!       "messageId": "invalidImplementationModule",
//!       "location": "/generators/app/implementation",
//!       "message": "app: Unable to find export app in implementation module",
//!       "data": { "identifier": "app", "key": "app" }
//!     }
//!   ],
//!   "errors": []
//! }
//! ```
//!
//! The exit code is non-zero when any problem or error was reported.

mod command;
mod executor;
mod results;

pub use command::{CheckCommand, OutputFormat};
pub use results::{CheckResults, ReportedDiagnostic};
