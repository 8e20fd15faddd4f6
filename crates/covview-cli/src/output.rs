//! Output formatting and progress reporting

use console::Style;
use covview::{
    AnnotatedLine, CoverageLineState, CoverageTables, FileCoverageRow, LineTally,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format for rendered results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Apply `style` when colors are on
fn paint(text: &str, style: &Style, use_color: bool) -> String {
    if use_color {
        style.clone().force_styling(true).apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

/// Gutter marker for a line state
#[must_use]
pub const fn marker(state: CoverageLineState) -> char {
    match state {
        CoverageLineState::Covered => '+',
        CoverageLineState::NotCovered => '-',
        CoverageLineState::Unknown => ' ',
    }
}

fn state_style(state: CoverageLineState) -> Style {
    match state {
        CoverageLineState::Covered => Style::new().green(),
        CoverageLineState::NotCovered => Style::new().red(),
        CoverageLineState::Unknown => Style::new().dim(),
    }
}

/// Render source lines with a number column and a coverage marker
#[must_use]
pub fn render_annotated(lines: &[AnnotatedLine], use_color: bool) -> String {
    let width = lines.last().map_or(1, |l| l.number.to_string().len());
    let mut output = String::new();
    for line in lines {
        let gutter = format!("{:>width$} {} │", line.number, marker(line.state));
        output.push_str(&paint(&gutter, &state_style(line.state), use_color));
        if !line.text.is_empty() {
            output.push(' ');
            output.push_str(&line.text);
        }
        output.push('\n');
    }
    output
}

/// One-line summary of a tally
#[must_use]
pub fn render_tally(tally: &LineTally, use_color: bool) -> String {
    format!(
        "{} covered, {} not covered, {} unknown",
        paint(&tally.covered.to_string(), &Style::new().green().bold(), use_color),
        paint(&tally.not_covered.to_string(), &Style::new().red().bold(), use_color),
        tally.unknown
    )
}

fn render_table(
    title: &str,
    rows: &[FileCoverageRow],
    tables: &CoverageTables,
    use_color: bool,
    output: &mut String,
) {
    output.push_str(&paint(
        &format!("{title} ({} files)", rows.len()),
        &Style::new().bold(),
        use_color,
    ));
    output.push('\n');
    if rows.is_empty() {
        output.push_str("  (none)\n");
        return;
    }

    let name_width = rows
        .iter()
        .map(|r| tables.display_name(r).chars().count())
        .max()
        .unwrap_or(0)
        .max("FILE".len());
    output.push_str(&format!(
        "  {:<name_width$}  {:>9}  {:>9}  {:>9}\n",
        "FILE", "COVERED", "UNCOVERED", "TOTAL"
    ));
    for row in rows {
        let uncovered = format!("{:>9}", row.uncovered);
        let uncovered = if row.uncovered > 0 {
            paint(&uncovered, &Style::new().red(), use_color)
        } else {
            uncovered
        };
        output.push_str(&format!(
            "  {:<name_width$}  {}  {}  {:>9}\n",
            tables.display_name(row),
            paint(&format!("{:>9}", row.covered), &Style::new().green(), use_color),
            uncovered,
            row.total()
        ));
    }
}

/// Render the selected and unselected tables
#[must_use]
pub fn render_tables(tables: &CoverageTables, use_color: bool) -> String {
    let mut output = String::new();
    render_table("Selected", &tables.selected, tables, use_color, &mut output);
    output.push('\n');
    render_table("Unselected", &tables.unselected, tables, use_color, &mut output);
    output
}

/// Serialize any value as pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Spinner shown on stderr while waiting on the network
#[derive(Debug)]
pub struct ProgressReporter {
    spinner: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Start a spinner; nothing is drawn in quiet mode
    #[must_use]
    pub fn spinner(message: &str, quiet: bool) -> Self {
        if quiet {
            return Self { spinner: None };
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { spinner: Some(pb) }
    }

    /// Remove the spinner
    pub fn finish(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}
