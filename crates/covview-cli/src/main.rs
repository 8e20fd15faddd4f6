//! covview: browse a source tree and watch live line coverage
//!
//! ## Usage
//!
//! ```bash
//! covview tree src --depth 2           # Print the tree two levels deep
//! covview annotate src/parser.c        # Source with per-line coverage
//! covview overview src                 # Coverage tables for a folder
//! covview watch src/parser.c           # Re-render on every update
//! covview config                       # Effective settings as YAML
//! ```

use clap::Parser;
use covview_cli::{
    build_config, handlers, init_logging, Cli, CliConfig, CliResult, Commands,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    init_logging(config.verbosity);

    match &cli.command {
        Commands::Config(args) => handlers::execute_config(&config, args),
        command => block_on(&config, command),
    }
}

fn block_on(config: &CliConfig, command: &Commands) -> CliResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        match command {
            Commands::Tree(args) => handlers::execute_tree(config, args).await,
            Commands::Annotate(args) => handlers::execute_annotate(config, args).await,
            Commands::Overview(args) => handlers::execute_overview(config, args).await,
            Commands::Watch(args) => handlers::execute_watch(config, args).await,
            Commands::Config(args) => handlers::execute_config(config, args),
        }
    })
}
