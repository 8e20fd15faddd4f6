//! Session - Owner of One Viewer's State
//!
//! A session owns the tree, the coverage synchronizer and the shared
//! selection target, and injects the filesystem gateway and coverage server
//! into them. Construction does no I/O; [`Session::start`] begins polling and
//! [`Session::shutdown`] stops it.
//!
//! ```text
//!            ┌──────────────────────── Session ────────────────────────┐
//!  open(id) ─┼─► TreeStore ──► FileSystemGateway                       │
//!  select() ─┼─► selection (watch) ──► CoverageSync ──► CoverageServer │
//!            └─────────────────────────────────────────────────────────┘
//! ```

use crate::config::ViewerConfig;
use crate::coverage::{
    annotate, AnnotatedLine, CoverageServer, CoverageSync, CoverageTables, FileCoverageSnapshot,
    HttpCoverageClient,
};
use crate::result::{CovviewError, CovviewResult};
use crate::selection::SelectionTarget;
use crate::tree::{FileSystemGateway, GatewayError, LocalFsGateway, NodeId, TreeError, TreeStore};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// A viewer session
pub struct Session {
    config: ViewerConfig,
    gateway: Arc<dyn FileSystemGateway>,
    server: Arc<dyn CoverageServer>,
    tree: TreeStore,
    coverage: CoverageSync,
    selection: watch::Sender<Option<SelectionTarget>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("coverage", &self.coverage)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session over the given collaborators
    pub fn new(
        config: ViewerConfig,
        gateway: Arc<dyn FileSystemGateway>,
        server: Arc<dyn CoverageServer>,
    ) -> CovviewResult<Self> {
        config.validate()?;
        let tree = TreeStore::new(Arc::clone(&gateway), &config.root);
        let coverage = CoverageSync::new(Arc::clone(&server), config.poll_interval());
        let (selection, _) = watch::channel(None);
        debug!(root = %config.root, server = %config.server_url, "session created");
        Ok(Self {
            config,
            gateway,
            server,
            tree,
            coverage,
            selection,
        })
    }

    /// Create a session over the local filesystem and the HTTP coverage server
    pub fn connect(config: ViewerConfig) -> CovviewResult<Self> {
        let server = Arc::new(HttpCoverageClient::new(config.server_url.clone()));
        Self::new(config, Arc::new(LocalFsGateway::new()), server)
    }

    /// Start background coverage polling
    pub fn start(&self) {
        self.coverage.spawn();
    }

    /// Stop polling and abort in-flight fetches
    pub fn shutdown(&self) {
        self.coverage.shutdown();
        info!("session shut down");
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The source tree
    #[must_use]
    pub const fn tree(&self) -> &TreeStore {
        &self.tree
    }

    /// The coverage synchronizer
    #[must_use]
    pub const fn coverage(&self) -> &CoverageSync {
        &self.coverage
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> Option<SelectionTarget> {
        self.selection.borrow().clone()
    }

    /// Receiver notified on every selection change
    #[must_use]
    pub fn subscribe_selection(&self) -> watch::Receiver<Option<SelectionTarget>> {
        self.selection.subscribe()
    }

    /// Expand a tree node
    pub async fn open(&self, id: &NodeId) -> Result<(), TreeError> {
        self.tree.expand(id).await
    }

    /// Make `target` the selection and poll it
    pub fn select(&self, target: SelectionTarget) {
        self.selection.send_replace(Some(target.clone()));
        self.coverage.retarget(target);
    }

    /// Select the file or folder behind a tree node
    pub fn select_node(&self, id: &NodeId) -> Result<SelectionTarget, TreeError> {
        let node = self
            .tree
            .node(id)
            .ok_or_else(|| TreeError::UnknownNode { id: id.clone() })?;
        let target = if node.is_branch() {
            SelectionTarget::folder(node.full_path())
        } else {
            SelectionTarget::file(node.full_path())
        };
        self.select(target.clone());
        Ok(target)
    }

    /// Click on a node: folders are expanded, then selected
    pub async fn activate(&self, id: &NodeId) -> Result<SelectionTarget, TreeError> {
        let target = self.select_node(id)?;
        if target.is_folder() {
            self.tree.expand(id).await?;
        }
        Ok(target)
    }

    /// Drop the selection and stop polling
    pub fn clear_selection(&self) {
        self.selection.send_replace(None);
        self.coverage.clear();
    }

    /// Read a source file through the gateway
    pub async fn read_source(&self, path: &str) -> Result<String, GatewayError> {
        self.gateway.read_file(path).await
    }

    /// Source of the selected file joined with its latest coverage.
    ///
    /// Lines are `Unknown` until the first fetch for the file lands.
    pub async fn annotated_selection(&self) -> CovviewResult<Vec<AnnotatedLine>> {
        let target = self.selection().ok_or(CovviewError::NoSelection)?;
        if target.is_folder() {
            return Err(CovviewError::WrongTargetKind {
                path: target.path,
                expected: "file",
            });
        }
        let source = self.read_source(&target.path).await?;
        let view = self.coverage.view();
        let snapshot = match view.snapshot() {
            Some(snapshot) if view.target() == Some(&target) => snapshot.clone(),
            _ => FileCoverageSnapshot::default(),
        };
        Ok(annotate(&snapshot, &source))
    }

    /// Fetch a file's coverage once and annotate its source
    pub async fn annotate_once(&self, path: &str) -> CovviewResult<Vec<AnnotatedLine>> {
        let source = self.read_source(path).await?;
        let snapshot = self.server.covered_lines(path).await?;
        Ok(annotate(&snapshot, &source))
    }

    /// Fetch a folder's coverage tables once
    pub async fn overview_once(&self, folder: &str) -> CovviewResult<CoverageTables> {
        let summary = self.server.coverage_overview(folder).await?;
        Ok(CoverageTables::from_summary(folder, summary))
    }
}
