//! covview CLI Library
//!
//! Terminal front-end for covview: print the source tree, annotate a file
//! with its line coverage, show a folder's coverage tables, or watch a
//! selection while the coverage server keeps updating.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;
pub mod tree;

pub use commands::{
    AnnotateArgs, Cli, ColorArg, Commands, ConfigArgs, FormatArg, OverviewArgs, TreeArgs,
    WatchArgs,
};
pub use config::{build_config, load_viewer_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use output::{
    marker, render_annotated, render_tables, render_tally, to_json, OutputFormat,
    ProgressReporter,
};
pub use tree::{render_tree, TreeConfig, TreeTotals};
