//! covview: Live Line Coverage over a Lazily Expanded Source Tree
//!
//! Browse a project's source tree and watch per-line coverage update while a
//! coverage-producing process (a fuzzer, a test run) is still running.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    COVVIEW Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐    │
//! │   │ TreeStore  │───►│ FileSystem │    │ CoverageServer     │    │
//! │   │ (lazy)     │    │ Gateway    │    │ /coveredLines      │    │
//! │   └────────────┘    └────────────┘    │ /coverageOverview  │    │
//! │         ▲                             └────────────────────┘    │
//! │         │ open / select                         ▲               │
//! │   ┌─────┴──────┐    retarget     ┌──────────────┴─────┐         │
//! │   │  Session   │────────────────►│  CoverageSync      │         │
//! │   └────────────┘                 │  (poll + ticket)   │         │
//! │                                  └────────┬───────────┘         │
//! │                                           ▼                     │
//! │                        CoverageView ─► annotate / tables        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use covview::{Session, SelectionTarget, ViewerConfig};
//!
//! # async fn run() -> covview::CovviewResult<()> {
//! let session = Session::connect(ViewerConfig::new().with_root("/proj"))?;
//! session.open(session.tree().root_id()).await?;
//! session.start();
//! session.select(SelectionTarget::file("/proj/a.cpp"));
//! let lines = session.annotated_selection().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Viewer configuration and YAML loading
pub mod config;

/// Coverage fetching, mapping and polling
pub mod coverage;

mod result;

/// The selection target
pub mod selection;

/// Session lifecycle
pub mod session;

/// Lazily expanded source tree
pub mod tree;

pub use config::{ConfigError, ViewerConfig, DEFAULT_CONFIG_FILE, DEFAULT_POLL_INTERVAL_MS};
pub use coverage::{
    annotate, state_at, tally, AnnotatedLine, CoverageFetchError, CoverageLineState,
    CoverageServer, CoverageSync, CoverageTables, CoverageView, FetchOutcome, FileCoverageRow,
    FileCoverageSnapshot, FolderCoverageSummary, HttpCoverageClient, LineTally,
    MockCoverageServer, DEFAULT_SERVER_URL,
};
pub use result::{CovviewError, CovviewResult};
pub use selection::{SelectionTarget, TargetKind};
pub use session::Session;
pub use tree::{
    DirEntry, FileSystemGateway, GatewayError, LocalFsGateway, MockGateway, NodeId, NodeKind,
    TreeError, TreeNode, TreeRow, TreeStore,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::coverage::{annotate, state_at, tally};
    pub use crate::{
        AnnotatedLine, CoverageLineState, CoverageView, CovviewError, CovviewResult,
        SelectionTarget, Session, TreeNode, ViewerConfig,
    };
}
