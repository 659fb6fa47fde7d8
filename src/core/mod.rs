//! Core types shared by every layer of plugin-checks.
//!
//! At the moment this is the error system: [`PluginCheckError`] for failures
//! of the tool itself and [`ErrorContext`] / [`user_friendly_error`] for
//! presenting them on the command line.

pub mod error;

pub use error::{ErrorContext, PluginCheckError, user_friendly_error};
