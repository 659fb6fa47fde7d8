//! Test utilities for plugin-checks
//!
//! Helpers shared by unit tests and the integration suite:
//!
//! - [`init_test_logging`] wires `tracing` output into the test harness
//! - [`TestWorkspace`] lays out a throwaway Nx-style workspace on disk
//!
//! Available to unit tests directly and to integration tests through the
//! `test-utils` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use plugin_checks::test_utils::TestWorkspace;
//!
//! let ws = TestWorkspace::builder()
//!     .unwrap()
//!     .with_project("my-plugin", "libs/my-plugin")
//!     .with_file("libs/my-plugin/generators.json", r#"{"generators": {}}"#)
//!     .build()
//!     .unwrap();
//!
//! assert!(ws.file_exists("nx.json"));
//! ```

pub mod workspace;

pub use workspace::{TestWorkspace, TestWorkspaceBuilder};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` decides, and without it nothing is logged.
///
/// ```bash
/// RUST_LOG=plugin_checks=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
