//! Cross-platform utilities and helpers
//!
//! - [`fs`] - lexical path handling, file reads, workspace root discovery
//! - [`platform`] - forward-slash path presentation for reports

pub mod fs;
pub mod platform;

pub use fs::{absolutize, find_workspace_root, join_relative, normalize_path, read_text_file};
pub use platform::{display_relative, normalize_path_for_storage};
