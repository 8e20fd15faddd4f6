//! Line coverage: per-line states and the mapping onto source lines.
//!
//! A [`FileCoverageSnapshot`] is the server's flat state array for one file.
//! Index `i` describes source line `i + 1`. Snapshots are often shorter than
//! the file (trailing lines the instrumentation never saw), so every lookup
//! past the end resolves to [`CoverageLineState::Unknown`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Coverage state of one source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageLineState {
    /// Not instrumented, or no data
    #[default]
    Unknown,
    /// Executed at least once
    Covered,
    /// Instrumented but never executed
    NotCovered,
}

impl CoverageLineState {
    /// Decode a wire code: 1 covered, 2 not covered, anything else unknown
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Covered,
            2 => Self::NotCovered,
            _ => Self::Unknown,
        }
    }

    /// Wire code for this state
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Covered => 1,
            Self::NotCovered => 2,
        }
    }
}

/// Requested line lies outside the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("line {line} is outside the coverage snapshot (1..={len})")]
pub struct IndexOutOfRange {
    /// Requested 1-based line
    pub line: usize,
    /// Snapshot length
    pub len: usize,
}

/// Latest per-line coverage for one file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileCoverageSnapshot {
    states: Vec<CoverageLineState>,
}

impl FileCoverageSnapshot {
    /// Wrap decoded states
    #[must_use]
    pub fn new(states: Vec<CoverageLineState>) -> Self {
        Self { states }
    }

    /// Decode the `coveredLines` integer array
    #[must_use]
    pub fn from_codes(codes: &[i64]) -> Self {
        codes.iter().copied().map(CoverageLineState::from_code).collect()
    }

    /// Number of lines the server reported
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the server reported no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States in line order
    #[must_use]
    pub fn states(&self) -> &[CoverageLineState] {
        &self.states
    }

    /// State of 1-based `line`, or the range error
    pub fn get(&self, line: usize) -> Result<CoverageLineState, IndexOutOfRange> {
        line.checked_sub(1)
            .and_then(|i| self.states.get(i).copied())
            .ok_or(IndexOutOfRange {
                line,
                len: self.states.len(),
            })
    }
}

impl FromIterator<CoverageLineState> for FileCoverageSnapshot {
    fn from_iter<I: IntoIterator<Item = CoverageLineState>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A source line joined with its coverage state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedLine {
    /// 1-based line number
    pub number: usize,
    /// Line text without the terminator
    pub text: String,
    /// Coverage state
    pub state: CoverageLineState,
}

/// Per-state counts over a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineTally {
    /// Covered lines
    pub covered: usize,
    /// Instrumented but unexecuted lines
    pub not_covered: usize,
    /// Lines without data
    pub unknown: usize,
}

impl LineTally {
    /// Lines the instrumentation knows about
    #[must_use]
    pub const fn instrumented(&self) -> usize {
        self.covered + self.not_covered
    }
}

/// State of 1-based `line`; out-of-range lines (including 0) are `Unknown`
#[must_use]
pub fn state_at(snapshot: &FileCoverageSnapshot, line: usize) -> CoverageLineState {
    match snapshot.get(line) {
        Ok(state) => state,
        Err(err) => {
            debug!(line = err.line, len = err.len, "line outside coverage snapshot");
            CoverageLineState::Unknown
        }
    }
}

/// Join every line of `source` with its state
#[must_use]
pub fn annotate(snapshot: &FileCoverageSnapshot, source: &str) -> Vec<AnnotatedLine> {
    let lines: Vec<AnnotatedLine> = source
        .lines()
        .enumerate()
        .map(|(i, text)| AnnotatedLine {
            number: i + 1,
            text: text.to_string(),
            state: snapshot.get(i + 1).unwrap_or_default(),
        })
        .collect();

    if lines.len() > snapshot.len() {
        debug!(
            lines = lines.len(),
            len = snapshot.len(),
            "source longer than coverage snapshot; trailing lines unknown"
        );
    }
    lines
}

/// Count states in a snapshot
#[must_use]
pub fn tally(snapshot: &FileCoverageSnapshot) -> LineTally {
    snapshot
        .states()
        .iter()
        .fold(LineTally::default(), |mut acc, state| {
            match state {
                CoverageLineState::Covered => acc.covered += 1,
                CoverageLineState::NotCovered => acc.not_covered += 1,
                CoverageLineState::Unknown => acc.unknown += 1,
            }
            acc
        })
}
