//! Folder coverage: the `coverageOverview` payload and its tables.
//!
//! The server partitions every known file into `selected` (under the queried
//! folder) and `unselected`. Counts and row order are passed through as the
//! server sent them.

use serde::{Deserialize, Serialize};

/// One file's line counts, encoded on the wire as `[filename, covered, uncovered]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u64, u64)", into = "(String, u64, u64)")]
pub struct FileCoverageRow {
    /// File path as reported by the server
    pub filename: String,
    /// Covered line count
    pub covered: u64,
    /// Uncovered line count
    pub uncovered: u64,
}

impl FileCoverageRow {
    /// Create a row
    #[must_use]
    pub fn new(filename: impl Into<String>, covered: u64, uncovered: u64) -> Self {
        Self {
            filename: filename.into(),
            covered,
            uncovered,
        }
    }

    /// Covered plus uncovered
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.covered.saturating_add(self.uncovered)
    }

    /// Filename relative to `folder` when the folder is a path prefix,
    /// otherwise the full filename
    #[must_use]
    pub fn relative_to(&self, folder: &str) -> &str {
        let folder = folder.trim_end_matches('/');
        if folder.is_empty() {
            return &self.filename;
        }
        self.filename
            .strip_prefix(folder)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(&self.filename)
    }
}

impl From<(String, u64, u64)> for FileCoverageRow {
    fn from((filename, covered, uncovered): (String, u64, u64)) -> Self {
        Self {
            filename,
            covered,
            uncovered,
        }
    }
}

impl From<FileCoverageRow> for (String, u64, u64) {
    fn from(row: FileCoverageRow) -> Self {
        (row.filename, row.covered, row.uncovered)
    }
}

/// The `coverageOverview` response body
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FolderCoverageSummary {
    /// Files under the queried folder
    pub selected: Vec<FileCoverageRow>,
    /// All other known files
    pub unselected: Vec<FileCoverageRow>,
}

/// The two renderable tables for a folder.
///
/// No merging or deduplication happens across the sets; a file listed in
/// both by the server appears in both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageTables {
    /// Folder the summary was fetched for
    pub folder: String,
    /// Rows for files under the folder
    pub selected: Vec<FileCoverageRow>,
    /// Rows for every other file
    pub unselected: Vec<FileCoverageRow>,
}

impl CoverageTables {
    /// Split a summary into its tables
    #[must_use]
    pub fn from_summary(folder: impl Into<String>, summary: FolderCoverageSummary) -> Self {
        Self {
            folder: folder.into(),
            selected: summary.selected,
            unselected: summary.unselected,
        }
    }

    /// Display name of a row relative to this table's folder
    #[must_use]
    pub fn display_name<'a>(&self, row: &'a FileCoverageRow) -> &'a str {
        row.relative_to(&self.folder)
    }

    /// Whether both tables are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.unselected.is_empty()
    }
}
