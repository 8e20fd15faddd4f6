//! Live coverage for the selected file or folder.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  COVERAGE PIPELINE                                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  CoverageServer ──► CoverageSync ──► CoverageView (watch)        │
//! │  (HTTP / mock)      tick + ticket        │                       │
//! │                                          ├─► line::annotate      │
//! │                                          └─► CoverageTables      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod line;
mod mock;
mod overview;
mod sync;

pub use client::{
    CoverageFetchError, CoverageServer, HttpCoverageClient, COVERAGE_OVERVIEW_ENDPOINT,
    COVERED_LINES_ENDPOINT, DEFAULT_SERVER_URL,
};
pub use line::{
    annotate, state_at, tally, AnnotatedLine, CoverageLineState, FileCoverageSnapshot,
    IndexOutOfRange, LineTally,
};
pub use mock::MockCoverageServer;
pub use overview::{CoverageTables, FileCoverageRow, FolderCoverageSummary};
pub use sync::{CoverageSync, CoverageView, FetchOutcome, FetchTicket, DEFAULT_POLL_INTERVAL};
