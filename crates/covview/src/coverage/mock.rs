//! Scripted coverage server for tests.
//!
//! Responses are queued per path. The last queued response for a path is
//! sticky, so a polling loop keeps receiving it; earlier ones are consumed in
//! order. A gate holds the next request for a path until released.

use super::client::{
    CoverageFetchError, CoverageServer, COVERAGE_OVERVIEW_ENDPOINT, COVERED_LINES_ENDPOINT,
};
use super::line::FileCoverageSnapshot;
use super::overview::FolderCoverageSummary;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// A scripted reply: the payload or an HTTP status to fail with
type Scripted<T> = Result<T, u16>;

#[derive(Debug, Default)]
struct Script {
    lines: HashMap<String, VecDeque<Scripted<FileCoverageSnapshot>>>,
    overviews: HashMap<String, VecDeque<Scripted<FolderCoverageSummary>>>,
    requests: HashMap<String, usize>,
    gates: HashMap<String, Arc<Notify>>,
}

fn next_reply<T: Clone>(queue: Option<&mut VecDeque<Scripted<T>>>) -> Option<Scripted<T>> {
    let queue = queue?;
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

/// In-memory [`CoverageServer`]
#[derive(Debug, Default)]
pub struct MockCoverageServer {
    script: Mutex<Script>,
}

impl MockCoverageServer {
    /// Create a server with nothing scripted (every request answers 404)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `coveredLines` reply for `path`
    pub fn push_lines(&self, path: &str, snapshot: FileCoverageSnapshot) {
        self.lock()
            .lines
            .entry(path.to_string())
            .or_default()
            .push_back(Ok(snapshot));
    }

    /// Queue a `coveredLines` failure with HTTP `status` for `path`
    pub fn push_lines_failure(&self, path: &str, status: u16) {
        self.lock()
            .lines
            .entry(path.to_string())
            .or_default()
            .push_back(Err(status));
    }

    /// Queue a `coverageOverview` reply for `path`
    pub fn push_overview(&self, path: &str, summary: FolderCoverageSummary) {
        self.lock()
            .overviews
            .entry(path.to_string())
            .or_default()
            .push_back(Ok(summary));
    }

    /// Queue a `coverageOverview` failure with HTTP `status` for `path`
    pub fn push_overview_failure(&self, path: &str, status: u16) {
        self.lock()
            .overviews
            .entry(path.to_string())
            .or_default()
            .push_back(Err(status));
    }

    /// Hold the next request for `path` until the returned gate is notified.
    ///
    /// The reply is chosen after the gate opens.
    pub fn hold_next(&self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().gates.insert(path.to_string(), Arc::clone(&gate));
        gate
    }

    /// Requests received for `path`, either endpoint
    #[must_use]
    pub fn request_count(&self, path: &str) -> usize {
        self.lock().requests.get(path).copied().unwrap_or(0)
    }

    /// Requests received across all paths
    #[must_use]
    pub fn total_requests(&self) -> usize {
        self.lock().requests.values().sum()
    }

    async fn admit(&self, path: &str) {
        let gate = {
            let mut script = self.lock();
            *script.requests.entry(path.to_string()).or_insert(0) += 1;
            script.gates.remove(path)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CoverageServer for MockCoverageServer {
    async fn covered_lines(&self, path: &str) -> Result<FileCoverageSnapshot, CoverageFetchError> {
        self.admit(path).await;
        let reply = next_reply(self.lock().lines.get_mut(path)).unwrap_or(Err(404));
        reply.map_err(|status| CoverageFetchError::Status {
            endpoint: COVERED_LINES_ENDPOINT,
            status,
        })
    }

    async fn coverage_overview(
        &self,
        path: &str,
    ) -> Result<FolderCoverageSummary, CoverageFetchError> {
        self.admit(path).await;
        let reply = next_reply(self.lock().overviews.get_mut(path)).unwrap_or(Err(404));
        reply.map_err(|status| CoverageFetchError::Status {
            endpoint: COVERAGE_OVERVIEW_ENDPOINT,
            status,
        })
    }
}
