//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use covview::ViewerConfig;

/// Execute the config command
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    print!("{}", config_output(config, args)?);
    Ok(())
}

/// Effective (or default) viewer settings as YAML, loadable with `--config`
pub fn config_output(config: &CliConfig, args: &ConfigArgs) -> CliResult<String> {
    let viewer = if args.defaults {
        ViewerConfig::default()
    } else {
        config.viewer.clone()
    };
    Ok(viewer.to_yaml()?)
}
