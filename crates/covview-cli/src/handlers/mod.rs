//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains the execution logic for one CLI command and
//! its pure helpers.

pub mod annotate;
pub mod config;
pub mod overview;
pub mod tree;
pub mod watch;

pub use annotate::execute_annotate;
pub use config::execute_config;
pub use overview::execute_overview;
pub use tree::execute_tree;
pub use watch::execute_watch;

use crate::error::{CliError, CliResult};
use std::path::Path;

/// Absolute, symlink-free form of an existing path, as the coverage server
/// expects
pub fn resolve_path(path: &Path) -> CliResult<String> {
    let resolved = std::fs::canonicalize(path).map_err(|e| {
        CliError::invalid_argument(format!("{}: {e}", path.display()))
    })?;
    resolved
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| CliError::invalid_argument(format!("{} is not valid UTF-8", path.display())))
}
