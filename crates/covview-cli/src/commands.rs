//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// covview: browse a source tree and watch live line coverage
#[derive(Parser, Debug)]
#[command(name = "covview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Coverage server base URL
    #[arg(long, global = true, env = "COVVIEW_SERVER", value_name = "URL")]
    pub server: Option<String>,

    /// Polling interval in milliseconds
    #[arg(long, global = true, env = "COVVIEW_INTERVAL_MS", value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Config file (defaults to ./covview.yaml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the source tree, expanding folders down to a depth
    Tree(TreeArgs),

    /// Fetch a file's line coverage once and print the annotated source
    Annotate(AnnotateArgs),

    /// Fetch a folder's coverage tables once
    Overview(OverviewArgs),

    /// Poll a file or folder and re-render on every update
    Watch(WatchArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the tree command
#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Root folder (defaults to the configured root)
    pub path: Option<PathBuf>,

    /// Levels of folders to expand
    #[arg(short, long, default_value = "1")]
    pub depth: usize,

    /// Only show files whose name matches this glob
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the annotate command
#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    /// Source file
    pub file: PathBuf,

    /// Print only the per-state line counts
    #[arg(long)]
    pub summary: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the overview command
#[derive(Parser, Debug)]
pub struct OverviewArgs {
    /// Folder (defaults to the configured root)
    pub folder: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// File or folder to watch
    pub target: PathBuf,

    /// Stop after this many updates
    #[arg(short = 'n', long)]
    pub updates: Option<usize>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print the built-in defaults instead of the effective configuration
    #[arg(long)]
    pub defaults: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
