//! CLI configuration
//!
//! Layering for the viewer settings: flags > environment (through clap) >
//! config file > built-in defaults.

use crate::commands::Cli;
use crate::error::CliResult;
use covview::{ViewerConfig, DEFAULT_CONFIG_FILE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Build from the `-q` flag and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default log filter directive for this level
    #[must_use]
    pub const fn log_level(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stdout().features().colors_supported(),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Viewer session settings
    pub viewer: ViewerConfig,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set viewer settings
    #[must_use]
    pub fn with_viewer(mut self, viewer: ViewerConfig) -> Self {
        self.viewer = viewer;
        self
    }

    /// Whether rendered output should be colored
    #[must_use]
    pub fn use_color(&self) -> bool {
        self.color.should_color()
    }
}

/// Resolve the full configuration for a parsed command line
pub fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let mut viewer = load_viewer_config(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_FILE))?;
    if let Some(url) = &cli.server {
        viewer.server_url.clone_from(url);
    }
    if let Some(ms) = cli.interval_ms {
        viewer.poll_interval_ms = ms;
    }
    viewer.validate()?;

    Ok(CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
        .with_viewer(viewer))
}

/// Load the explicit config file, else `fallback` when it exists, else defaults
pub fn load_viewer_config(explicit: Option<&Path>, fallback: &Path) -> CliResult<ViewerConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return Ok(ViewerConfig::load(path)?);
    }
    if fallback.is_file() {
        debug!(path = %fallback.display(), "loading config");
        return Ok(ViewerConfig::load(fallback)?);
    }
    Ok(ViewerConfig::default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use clap::Parser;
    use tempfile::TempDir;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 4), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
        }

        #[test]
        fn test_log_levels() {
            assert_eq!(Verbosity::Quiet.log_level(), "error");
            assert_eq!(Verbosity::Normal.log_level(), "warn");
            assert_eq!(Verbosity::Verbose.log_level(), "info");
            assert_eq!(Verbosity::Debug.log_level(), "debug");
            assert!(Verbosity::Debug.is_verbose());
            assert!(Verbosity::Verbose.is_verbose());
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Quiet.is_quiet());
        }

        #[test]
        fn test_color_choice() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod layering_tests {
        use super::*;

        fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
            let path = dir.path().join("covview.yaml");
            std::fs::write(&path, body).unwrap();
            path
        }

        #[test]
        fn test_defaults_without_file() {
            let dir = TempDir::new().unwrap();
            let config = load_viewer_config(None, &dir.path().join("covview.yaml")).unwrap();
            assert_eq!(config, ViewerConfig::default());
        }

        #[test]
        fn test_fallback_file_is_used() {
            let dir = TempDir::new().unwrap();
            let path = write_config(&dir, "poll_interval_ms: 750\n");
            let config = load_viewer_config(None, &path).unwrap();
            assert_eq!(config.poll_interval_ms, 750);
        }

        #[test]
        fn test_explicit_file_must_exist() {
            let dir = TempDir::new().unwrap();
            let err = load_viewer_config(Some(&dir.path().join("nope.yaml")), Path::new("x"))
                .unwrap_err();
            assert!(matches!(err, CliError::Config(_)));
        }

        #[test]
        fn test_flags_override_file() {
            let dir = TempDir::new().unwrap();
            let path = write_config(
                &dir,
                "server_url: http://from-file:1\npoll_interval_ms: 750\nroot: /proj\n",
            );
            let cli = Cli::try_parse_from([
                "covview",
                "--config",
                path.to_str().unwrap(),
                "--server",
                "http://from-flag:2",
                "-q",
                "config",
            ])
            .unwrap();

            let config = build_config(&cli).unwrap();
            assert_eq!(config.viewer.server_url, "http://from-flag:2");
            assert_eq!(config.viewer.poll_interval_ms, 750);
            assert_eq!(config.viewer.root, "/proj");
            assert_eq!(config.verbosity, Verbosity::Quiet);
        }

        #[test]
        fn test_invalid_interval_rejected() {
            let cli =
                Cli::try_parse_from(["covview", "--interval-ms", "0", "config"]).unwrap();
            assert!(matches!(build_config(&cli), Err(CliError::Config(_))));
        }
    }
}
