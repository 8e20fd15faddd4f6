//! Overview command handler

use super::resolve_path;
use crate::commands::OverviewArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_tables, to_json, OutputFormat, ProgressReporter};
use covview::{CoverageTables, Session};
use std::path::Path;

/// Execute the overview command
pub async fn execute_overview(config: &CliConfig, args: &OverviewArgs) -> CliResult<()> {
    let folder = args
        .folder
        .as_deref()
        .unwrap_or_else(|| Path::new(&config.viewer.root));
    let folder = resolve_path(folder)?;
    let session = Session::connect(config.viewer.clone())?;

    let progress = ProgressReporter::spinner(
        &format!("Fetching coverage overview for {folder}"),
        config.verbosity.is_quiet(),
    );
    let tables = session.overview_once(&folder).await;
    progress.finish();

    print!(
        "{}",
        overview_output(&tables?, args.format.into(), config.use_color())?
    );
    Ok(())
}

/// Render folder tables in the requested format
pub fn overview_output(
    tables: &CoverageTables,
    format: OutputFormat,
    use_color: bool,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(to_json(tables)? + "\n"),
        OutputFormat::Text => Ok(format!(
            "{}\n\n{}",
            tables.folder,
            render_tables(tables, use_color)
        )),
    }
}
