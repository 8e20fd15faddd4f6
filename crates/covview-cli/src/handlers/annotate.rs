//! Annotate command handler

use super::resolve_path;
use crate::commands::AnnotateArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_annotated, render_tally, to_json, OutputFormat, ProgressReporter};
use covview::{tally, AnnotatedLine, FileCoverageSnapshot, LineTally, Session};
use serde::Serialize;

/// Execute the annotate command
pub async fn execute_annotate(config: &CliConfig, args: &AnnotateArgs) -> CliResult<()> {
    let path = resolve_path(&args.file)?;
    let session = Session::connect(config.viewer.clone())?;

    let progress = ProgressReporter::spinner(
        &format!("Fetching coverage for {path}"),
        config.verbosity.is_quiet(),
    );
    let lines = session.annotate_once(&path).await;
    progress.finish();

    let text = annotate_output(
        &path,
        &lines?,
        args.summary,
        args.format.into(),
        config.use_color(),
    )?;
    print!("{text}");
    Ok(())
}

/// Counts over the annotated lines of a file
#[must_use]
pub fn line_tally(lines: &[AnnotatedLine]) -> LineTally {
    let states: FileCoverageSnapshot = lines.iter().map(|line| line.state).collect();
    tally(&states)
}

#[derive(Serialize)]
struct AnnotateReport<'a> {
    path: &'a str,
    tally: LineTally,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<&'a [AnnotatedLine]>,
}

/// Render a fetched file in the requested format
pub fn annotate_output(
    path: &str,
    lines: &[AnnotatedLine],
    summary: bool,
    format: OutputFormat,
    use_color: bool,
) -> CliResult<String> {
    let counts = line_tally(lines);
    match format {
        OutputFormat::Json => {
            let report = AnnotateReport {
                path,
                tally: counts,
                lines: (!summary).then_some(lines),
            };
            Ok(to_json(&report)? + "\n")
        }
        OutputFormat::Text if summary => {
            Ok(format!("{path}: {}\n", render_tally(&counts, use_color)))
        }
        OutputFormat::Text => Ok(format!(
            "{}\n{}\n",
            render_annotated(lines, use_color),
            render_tally(&counts, use_color)
        )),
    }
}
