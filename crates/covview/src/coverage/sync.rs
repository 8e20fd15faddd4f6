//! CoverageSync - Polling Coverage Synchronizer
//!
//! Polls the coverage server for the current selection target once per
//! interval and publishes the result as a [`CoverageView`] on a watch
//! channel.
//!
//! ```text
//!            retarget(B)                     tick / retarget
//!   UI ─────────────────► SyncState ◄──────────────────────── poll loop
//!                          epoch += 1                          │ issue()
//!                          view = AwaitingFirstFetch(B)        ▼
//!                                                     FetchTicket{epoch, seq}
//!                                                              │ fetch
//!                                                              ▼
//!                 apply: same epoch and seq > last applied? ──yes──► publish view
//!                                                          └─no───► Stale (dropped)
//! ```
//!
//! # Per-target state machine
//!
//! `NoSelection → AwaitingFirstFetch → Annotated | Summarized`; a successful
//! tick replaces the data, a failed tick keeps it, and any retarget resets to
//! `AwaitingFirstFetch` for the new target.

use super::client::{CoverageFetchError, CoverageServer};
use super::line::{CoverageLineState, FileCoverageSnapshot};
use super::overview::CoverageTables;
use crate::selection::{SelectionTarget, TargetKind};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Identity of one issued fetch.
///
/// `epoch` changes on every retarget; `sequence` counts fetches within an
/// epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket {
    /// Target generation
    pub epoch: u64,
    /// Fetch number within the epoch, starting at 1
    pub sequence: u64,
}

/// What happened to a fetch's response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Published as the new view
    Applied,
    /// Superseded by a newer fetch or a retarget; discarded
    Stale,
    /// Fetch failed; the previous view was kept
    Failed,
}

/// Published coverage state for the current target
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoverageView {
    /// Nothing selected
    #[default]
    NoSelection,
    /// Target selected, no successful fetch yet
    AwaitingFirstFetch(SelectionTarget),
    /// Latest line coverage for a file
    Annotated {
        /// Selected file
        target: SelectionTarget,
        /// Latest snapshot
        snapshot: FileCoverageSnapshot,
    },
    /// Latest tables for a folder
    Summarized {
        /// Selected folder
        target: SelectionTarget,
        /// Latest tables
        tables: CoverageTables,
    },
}

impl CoverageView {
    /// Target this view describes
    #[must_use]
    pub const fn target(&self) -> Option<&SelectionTarget> {
        match self {
            Self::NoSelection => None,
            Self::AwaitingFirstFetch(target)
            | Self::Annotated { target, .. }
            | Self::Summarized { target, .. } => Some(target),
        }
    }

    /// Line snapshot, when a file has been fetched
    #[must_use]
    pub const fn snapshot(&self) -> Option<&FileCoverageSnapshot> {
        match self {
            Self::Annotated { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// Folder tables, when a folder has been fetched
    #[must_use]
    pub const fn tables(&self) -> Option<&CoverageTables> {
        match self {
            Self::Summarized { tables, .. } => Some(tables),
            _ => None,
        }
    }

    /// State of 1-based `line`; `Unknown` until a snapshot exists
    #[must_use]
    pub fn state_at(&self, line: usize) -> CoverageLineState {
        self.snapshot()
            .map_or(CoverageLineState::Unknown, |snapshot| {
                super::line::state_at(snapshot, line)
            })
    }

    /// Whether data has arrived for the current target
    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        matches!(self, Self::Annotated { .. } | Self::Summarized { .. })
    }
}

#[derive(Debug, Default)]
struct SyncState {
    target: Option<SelectionTarget>,
    epoch: u64,
    issued: u64,
    /// Sequence of the newest response published in this epoch
    applied: u64,
}

struct SyncShared {
    server: Arc<dyn CoverageServer>,
    state: Mutex<SyncState>,
    view: watch::Sender<CoverageView>,
    retargeted: Notify,
}

impl SyncShared {
    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve the next ticket for the current target
    fn issue(self: &Arc<Self>) -> Option<BoxFuture<'static, FetchOutcome>> {
        let (ticket, target) = {
            let mut state = self.lock();
            let target = state.target.clone()?;
            state.issued += 1;
            (
                FetchTicket {
                    epoch: state.epoch,
                    sequence: state.issued,
                },
                target,
            )
        };

        let shared = Arc::clone(self);
        Some(
            async move {
                let result = shared.fetch(&target).await;
                shared.apply(ticket, &target, result)
            }
            .boxed(),
        )
    }

    async fn fetch(&self, target: &SelectionTarget) -> Result<CoverageView, CoverageFetchError> {
        let view = match target.kind {
            TargetKind::File => CoverageView::Annotated {
                target: target.clone(),
                snapshot: self.server.covered_lines(&target.path).await?,
            },
            TargetKind::Folder => {
                let summary = self.server.coverage_overview(&target.path).await?;
                CoverageView::Summarized {
                    target: target.clone(),
                    tables: CoverageTables::from_summary(target.path.clone(), summary),
                }
            }
        };
        Ok(view)
    }

    /// Publish `result` unless a retarget or a newer response superseded
    /// `ticket`. Overlapping fetches within an epoch may each land in turn.
    fn apply(
        &self,
        ticket: FetchTicket,
        target: &SelectionTarget,
        result: Result<CoverageView, CoverageFetchError>,
    ) -> FetchOutcome {
        let mut state = self.lock();
        if state.epoch != ticket.epoch || ticket.sequence <= state.applied {
            debug!(
                path = %target.path,
                epoch = ticket.epoch,
                sequence = ticket.sequence,
                "discarding stale coverage response"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(view) => {
                debug!(path = %target.path, sequence = ticket.sequence, "coverage updated");
                state.applied = ticket.sequence;
                self.view.send_replace(view);
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(path = %target.path, error = %err, "coverage fetch failed; keeping previous data");
                FetchOutcome::Failed
            }
        }
    }
}

async fn poll_loop(shared: Arc<SyncShared>, period: Duration) {
    let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut fetches = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            () = shared.retargeted.notified() => ticker.reset(),
            _ = ticker.tick() => {}
            Some(joined) = fetches.join_next() => {
                if let Err(err) = joined {
                    if err.is_panic() {
                        warn!("coverage fetch task panicked");
                    }
                }
                continue;
            }
        }

        if let Some(fetch) = shared.issue() {
            fetches.spawn(fetch);
        }
    }
}

/// Background poller and publisher of the current [`CoverageView`]
pub struct CoverageSync {
    shared: Arc<SyncShared>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for CoverageSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverageSync")
            .field("interval", &self.interval)
            .field("target", &self.shared.lock().target)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CoverageSync {
    /// Create an idle synchronizer; call [`Self::spawn`] to start polling
    #[must_use]
    pub fn new(server: Arc<dyn CoverageServer>, interval: Duration) -> Self {
        let (view, _) = watch::channel(CoverageView::NoSelection);
        Self {
            shared: Arc::new(SyncShared {
                server,
                state: Mutex::new(SyncState::default()),
                view,
                retargeted: Notify::new(),
            }),
            interval,
            task: Mutex::new(None),
        }
    }

    /// Polling interval
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the polling loop on the current tokio runtime.
    /// No-op while a loop is already running.
    pub fn spawn(&self) {
        let mut task = self.lock_task();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }
        *task = Some(tokio::spawn(poll_loop(Arc::clone(&self.shared), self.interval)));
        info!(interval_ms = self.interval.as_millis() as u64, "coverage polling started");
    }

    /// Whether the polling loop is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_task().as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Switch polling to `target`.
    ///
    /// Responses for the previous target are discarded from now on and the
    /// view resets to `AwaitingFirstFetch`. Returns false when `target` is
    /// already current.
    pub fn retarget(&self, target: SelectionTarget) -> bool {
        {
            let mut state = self.shared.lock();
            if state.target.as_ref() == Some(&target) {
                return false;
            }
            state.epoch += 1;
            state.issued = 0;
            state.applied = 0;
            state.target = Some(target.clone());
            info!(selection = %target, epoch = state.epoch, "coverage target changed");
            self.shared
                .view
                .send_replace(CoverageView::AwaitingFirstFetch(target));
        }
        self.shared.retargeted.notify_one();
        true
    }

    /// Stop polling any target and publish `NoSelection`
    pub fn clear(&self) {
        let mut state = self.shared.lock();
        if state.target.take().is_some() {
            state.epoch += 1;
            state.issued = 0;
            state.applied = 0;
            debug!(epoch = state.epoch, "coverage target cleared");
        }
        self.shared.view.send_replace(CoverageView::NoSelection);
    }

    /// Current target
    #[must_use]
    pub fn target(&self) -> Option<SelectionTarget> {
        self.shared.lock().target.clone()
    }

    /// Issue one fetch for the current target.
    ///
    /// The ticket is reserved immediately; the returned future performs the
    /// request and applies the response. `None` when nothing is selected.
    pub fn issue_fetch(&self) -> Option<BoxFuture<'static, FetchOutcome>> {
        self.shared.issue()
    }

    /// Latest published view
    #[must_use]
    pub fn view(&self) -> CoverageView {
        self.shared.view.borrow().clone()
    }

    /// Receiver notified on every published view
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CoverageView> {
        self.shared.view.subscribe()
    }

    /// Stop the polling loop and abort in-flight fetches
    pub fn shutdown(&self) {
        if let Some(task) = self.lock_task().take() {
            task.abort();
            info!("coverage polling stopped");
        }
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CoverageSync {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::coverage::{FileCoverageRow, FolderCoverageSummary, MockCoverageServer};

    const A: &str = "/proj/a.cpp";
    const B: &str = "/proj/b.cpp";

    fn snap(codes: &[i64]) -> FileCoverageSnapshot {
        FileCoverageSnapshot::from_codes(codes)
    }

    fn sync_with(server: &Arc<MockCoverageServer>) -> CoverageSync {
        CoverageSync::new(
            Arc::clone(server) as Arc<dyn CoverageServer>,
            DEFAULT_POLL_INTERVAL,
        )
    }

    /// Answers every request after a fixed delay
    struct SlowServer {
        latency: Duration,
        lines: std::collections::HashMap<String, FileCoverageSnapshot>,
    }

    impl SlowServer {
        fn new(latency: Duration, files: &[(&str, &[i64])]) -> Self {
            Self {
                latency,
                lines: files
                    .iter()
                    .map(|(path, codes)| ((*path).to_string(), snap(codes)))
                    .collect(),
            }
        }
    }

    #[async_trait::async_trait]
    impl CoverageServer for SlowServer {
        async fn covered_lines(
            &self,
            path: &str,
        ) -> Result<FileCoverageSnapshot, CoverageFetchError> {
            tokio::time::sleep(self.latency).await;
            self.lines
                .get(path)
                .cloned()
                .ok_or_else(|| CoverageFetchError::Status {
                    endpoint: "coveredLines",
                    status: 404,
                })
        }

        async fn coverage_overview(
            &self,
            _path: &str,
        ) -> Result<FolderCoverageSummary, CoverageFetchError> {
            tokio::time::sleep(self.latency).await;
            Err(CoverageFetchError::Status {
                endpoint: "coverageOverview",
                status: 404,
            })
        }
    }

    async fn wait_until(sync: &CoverageSync, pred: impl FnMut(&CoverageView) -> bool) -> CoverageView {
        let mut rx = sync.subscribe();
        let view = rx.wait_for(pred).await.unwrap().clone();
        view
    }

    mod view_tests {
        use super::*;

        #[test]
        fn test_view_accessors() {
            let target = SelectionTarget::file(A);
            let view = CoverageView::Annotated {
                target: target.clone(),
                snapshot: snap(&[1, 2]),
            };
            assert_eq!(view.target(), Some(&target));
            assert_eq!(view.state_at(2), CoverageLineState::NotCovered);
            assert_eq!(view.state_at(3), CoverageLineState::Unknown);
            assert!(view.is_fetched());
            assert!(view.tables().is_none());

            let waiting = CoverageView::AwaitingFirstFetch(target);
            assert_eq!(waiting.state_at(1), CoverageLineState::Unknown);
            assert!(!waiting.is_fetched());
            assert!(CoverageView::default().target().is_none());
        }
    }

    mod ticket_tests {
        use super::*;

        #[tokio::test]
        async fn test_no_fetch_without_target() {
            let server = Arc::new(MockCoverageServer::new());
            let sync = sync_with(&server);
            assert!(sync.issue_fetch().is_none());
            assert_eq!(sync.view(), CoverageView::NoSelection);
        }

        #[tokio::test]
        async fn test_retarget_resets_view() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1]));
            let sync = sync_with(&server);

            assert!(sync.retarget(SelectionTarget::file(A)));
            assert_eq!(
                sync.view(),
                CoverageView::AwaitingFirstFetch(SelectionTarget::file(A))
            );
            assert_eq!(sync.issue_fetch().unwrap().await, FetchOutcome::Applied);
            assert_eq!(sync.view().snapshot(), Some(&snap(&[1])));

            assert!(!sync.retarget(SelectionTarget::file(A)));
            assert!(sync.view().is_fetched());

            assert!(sync.retarget(SelectionTarget::file(B)));
            assert_eq!(
                sync.view(),
                CoverageView::AwaitingFirstFetch(SelectionTarget::file(B))
            );
        }

        #[tokio::test]
        async fn test_late_response_for_old_target_is_discarded() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1, 1]));
            server.push_lines(B, snap(&[2, 2, 2]));
            let gate = server.hold_next(A);
            let sync = sync_with(&server);

            sync.retarget(SelectionTarget::file(A));
            let slow = tokio::spawn(sync.issue_fetch().unwrap());
            tokio::task::yield_now().await;

            sync.retarget(SelectionTarget::file(B));
            assert_eq!(sync.issue_fetch().unwrap().await, FetchOutcome::Applied);

            gate.notify_one();
            assert_eq!(slow.await.unwrap(), FetchOutcome::Stale);

            let view = sync.view();
            assert_eq!(view.target(), Some(&SelectionTarget::file(B)));
            assert_eq!(view.snapshot(), Some(&snap(&[2, 2, 2])));
        }

        #[tokio::test]
        async fn test_older_fetch_never_overwrites_newer() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[2]));
            server.push_lines(A, snap(&[1]));
            let gate = server.hold_next(A);
            let sync = sync_with(&server);
            sync.retarget(SelectionTarget::file(A));

            // k is held at the server; k+1 completes first.
            let older = tokio::spawn(sync.issue_fetch().unwrap());
            tokio::task::yield_now().await;
            let newer = sync.issue_fetch().unwrap();
            assert_eq!(newer.await, FetchOutcome::Applied);
            let applied = sync.view();

            gate.notify_one();
            assert_eq!(older.await.unwrap(), FetchOutcome::Stale);
            assert_eq!(sync.view(), applied);
        }

        #[tokio::test]
        async fn test_older_fetch_lands_while_newer_in_flight() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[2]));
            server.push_lines(A, snap(&[1]));
            let sync = sync_with(&server);
            sync.retarget(SelectionTarget::file(A));

            // k completes while k+1 is still issued but unanswered.
            let older = sync.issue_fetch().unwrap();
            let newer = sync.issue_fetch().unwrap();
            assert_eq!(older.await, FetchOutcome::Applied);
            assert_eq!(sync.view().state_at(1), CoverageLineState::NotCovered);

            assert_eq!(newer.await, FetchOutcome::Applied);
            assert_eq!(sync.view().state_at(1), CoverageLineState::Covered);
        }

        #[tokio::test]
        async fn test_failure_keeps_previous_snapshot() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1, 1, 2, 0, 1]));
            server.push_lines_failure(A, 500);
            server.push_lines(A, snap(&[1, 1, 1, 1, 1]));
            let sync = sync_with(&server);
            sync.retarget(SelectionTarget::file(A));

            assert_eq!(sync.issue_fetch().unwrap().await, FetchOutcome::Applied);
            let before = sync.view();
            assert_eq!(before.state_at(3), CoverageLineState::NotCovered);

            assert_eq!(sync.issue_fetch().unwrap().await, FetchOutcome::Failed);
            assert_eq!(sync.view(), before);

            assert_eq!(sync.issue_fetch().unwrap().await, FetchOutcome::Applied);
            assert_eq!(sync.view().state_at(3), CoverageLineState::Covered);
        }

        #[tokio::test]
        async fn test_failure_before_first_fetch_stays_awaiting() {
            let server = Arc::new(MockCoverageServer::new());
            let sync = sync_with(&server);
            sync.retarget(SelectionTarget::file(A));

            assert_eq!(sync.issue_fetch().unwrap().await, FetchOutcome::Failed);
            assert_eq!(
                sync.view(),
                CoverageView::AwaitingFirstFetch(SelectionTarget::file(A))
            );
        }

        #[tokio::test]
        async fn test_folder_target_is_summarized() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_overview(
                "/proj/lib",
                FolderCoverageSummary {
                    selected: vec![FileCoverageRow::new("/proj/lib/x.c", 3, 1)],
                    unselected: vec![FileCoverageRow::new("/proj/y.c", 0, 2)],
                },
            );
            let sync = sync_with(&server);
            sync.retarget(SelectionTarget::folder("/proj/lib"));

            assert_eq!(sync.issue_fetch().unwrap().await, FetchOutcome::Applied);
            let view = sync.view();
            let tables = view.tables().unwrap();
            assert_eq!(tables.folder, "/proj/lib");
            assert_eq!(tables.selected[0].covered, 3);
            assert_eq!(tables.unselected[0].uncovered, 2);
            assert!(view.snapshot().is_none());
        }

        #[tokio::test]
        async fn test_clear_discards_in_flight() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1]));
            let gate = server.hold_next(A);
            let sync = sync_with(&server);
            sync.retarget(SelectionTarget::file(A));

            let pending = tokio::spawn(sync.issue_fetch().unwrap());
            tokio::task::yield_now().await;
            sync.clear();
            gate.notify_one();

            assert_eq!(pending.await.unwrap(), FetchOutcome::Stale);
            assert_eq!(sync.view(), CoverageView::NoSelection);
            assert!(sync.target().is_none());
            assert!(sync.issue_fetch().is_none());
        }
    }

    mod loop_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_polls_once_per_interval() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1]));
            let sync = sync_with(&server);
            sync.spawn();
            assert!(sync.is_running());

            sync.retarget(SelectionTarget::file(A));
            tokio::time::sleep(Duration::from_millis(4100)).await;

            // Immediately on retarget, then at 2s and 4s.
            assert_eq!(server.request_count(A), 3);
            assert!(sync.view().is_fetched());
            sync.shutdown();
        }

        #[tokio::test(start_paused = true)]
        async fn test_failed_tick_then_recovery() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1, 1, 2, 0, 1]));
            server.push_lines_failure(A, 500);
            server.push_lines(A, snap(&[1, 1, 1, 0, 1]));
            let sync = sync_with(&server);
            sync.spawn();
            sync.retarget(SelectionTarget::file(A));

            let first = wait_until(&sync, CoverageView::is_fetched).await;
            assert_eq!(first.state_at(3), CoverageLineState::NotCovered);

            tokio::time::sleep(Duration::from_millis(2100)).await;
            assert_eq!(server.request_count(A), 2);
            assert_eq!(sync.view(), first);

            tokio::time::sleep(Duration::from_millis(2000)).await;
            assert_eq!(sync.view().state_at(3), CoverageLineState::Covered);
            sync.shutdown();
        }

        #[tokio::test(start_paused = true)]
        async fn test_retarget_polls_new_target_immediately() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1]));
            server.push_lines(B, snap(&[2]));
            let sync = sync_with(&server);
            sync.spawn();

            sync.retarget(SelectionTarget::file(A));
            wait_until(&sync, CoverageView::is_fetched).await;

            tokio::time::sleep(Duration::from_millis(500)).await;
            let start = tokio::time::Instant::now();
            sync.retarget(SelectionTarget::file(B));
            let view = wait_until(&sync, CoverageView::is_fetched).await;

            assert_eq!(view.target(), Some(&SelectionTarget::file(B)));
            assert_eq!(view.state_at(1), CoverageLineState::NotCovered);
            assert!(start.elapsed() < Duration::from_millis(100));
            sync.shutdown();
        }

        #[tokio::test(start_paused = true)]
        async fn test_server_slower_than_interval_still_publishes() {
            let server = Arc::new(SlowServer::new(
                Duration::from_millis(2500),
                &[(A, &[1, 2])],
            ));
            let sync = CoverageSync::new(server, DEFAULT_POLL_INTERVAL);
            sync.spawn();
            sync.retarget(SelectionTarget::file(A));

            tokio::time::sleep(Duration::from_millis(2600)).await;
            let view = sync.view();
            assert!(view.is_fetched(), "still waiting: {view:?}");
            assert_eq!(view.state_at(2), CoverageLineState::NotCovered);

            tokio::time::sleep(Duration::from_secs(60)).await;
            assert_eq!(sync.view().target(), Some(&SelectionTarget::file(A)));
            assert!(sync.view().is_fetched());
            sync.shutdown();
        }

        #[tokio::test(start_paused = true)]
        async fn test_slow_response_for_old_target_is_dropped() {
            let server = Arc::new(SlowServer::new(
                Duration::from_millis(2500),
                &[(A, &[1]), (B, &[2, 2])],
            ));
            let sync = CoverageSync::new(server, DEFAULT_POLL_INTERVAL);
            let start = tokio::time::Instant::now();
            sync.spawn();
            sync.retarget(SelectionTarget::file(A));

            // A's first answer would land at 2.5s; B is selected at 1s.
            tokio::time::sleep_until(start + Duration::from_millis(1000)).await;
            sync.retarget(SelectionTarget::file(B));

            tokio::time::sleep_until(start + Duration::from_millis(2700)).await;
            assert_eq!(
                sync.view(),
                CoverageView::AwaitingFirstFetch(SelectionTarget::file(B))
            );

            tokio::time::sleep_until(start + Duration::from_millis(3600)).await;
            let view = sync.view();
            assert_eq!(view.target(), Some(&SelectionTarget::file(B)));
            assert_eq!(view.snapshot(), Some(&snap(&[2, 2])));
            sync.shutdown();
        }

        #[tokio::test(start_paused = true)]
        async fn test_idle_without_target() {
            let server = Arc::new(MockCoverageServer::new());
            let sync = sync_with(&server);
            sync.spawn();
            tokio::time::sleep(Duration::from_secs(10)).await;
            assert_eq!(server.total_requests(), 0);
            sync.shutdown();
        }

        #[tokio::test(start_paused = true)]
        async fn test_shutdown_stops_polling() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1]));
            let sync = sync_with(&server);
            sync.spawn();
            sync.retarget(SelectionTarget::file(A));
            wait_until(&sync, CoverageView::is_fetched).await;

            sync.shutdown();
            tokio::task::yield_now().await;
            assert!(!sync.is_running());
            let seen = server.request_count(A);

            tokio::time::sleep(Duration::from_secs(10)).await;
            assert_eq!(server.request_count(A), seen);
        }

        #[tokio::test(start_paused = true)]
        async fn test_clear_stops_requests() {
            let server = Arc::new(MockCoverageServer::new());
            server.push_lines(A, snap(&[1]));
            let sync = sync_with(&server);
            sync.spawn();
            sync.retarget(SelectionTarget::file(A));
            wait_until(&sync, CoverageView::is_fetched).await;

            sync.clear();
            let seen = server.request_count(A);
            tokio::time::sleep(Duration::from_secs(10)).await;
            assert_eq!(server.request_count(A), seen);
            assert_eq!(sync.view(), CoverageView::NoSelection);
            sync.shutdown();
        }
    }
}
