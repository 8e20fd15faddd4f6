//! In-memory gateway for tests.
//!
//! Listings are scripted per path, every listing request is counted, and a
//! gate can hold a listing in flight until the test releases it.

use super::gateway::{DirEntry, FileSystemGateway, GatewayError, GatewayResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct MockFs {
    dirs: HashMap<String, GatewayResult<Vec<DirEntry>>>,
    files: HashMap<String, String>,
    listings: HashMap<String, usize>,
    gates: HashMap<String, Arc<Notify>>,
}

/// Scripted in-memory filesystem
#[derive(Debug, Default)]
pub struct MockGateway {
    fs: Mutex<MockFs>,
}

impl MockGateway {
    /// Create an empty mock filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set_dir`]
    #[must_use]
    pub fn with_dir(self, path: &str, entries: Vec<DirEntry>) -> Self {
        self.set_dir(path, entries);
        self
    }

    /// Builder form of [`Self::set_file`]
    #[must_use]
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.set_file(path, contents);
        self
    }

    /// Script the listing of `path`
    pub fn set_dir(&self, path: &str, entries: Vec<DirEntry>) {
        self.lock().dirs.insert(path.to_string(), Ok(entries));
    }

    /// Make listings of `path` fail with an I/O error
    pub fn fail_dir(&self, path: &str, message: &str) {
        self.lock().dirs.insert(
            path.to_string(),
            Err(GatewayError::Io {
                path: path.to_string(),
                message: message.to_string(),
            }),
        );
    }

    /// Script the contents of the file at `path`
    pub fn set_file(&self, path: &str, contents: &str) {
        self.lock()
            .files
            .insert(path.to_string(), contents.to_string());
    }

    /// Hold the next listing of `path` until the returned gate is notified.
    ///
    /// The request is counted before it blocks.
    pub fn gate(&self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().gates.insert(path.to_string(), Arc::clone(&gate));
        gate
    }

    /// Number of listing requests issued for `path`
    #[must_use]
    pub fn listing_count(&self, path: &str) -> usize {
        self.lock().listings.get(path).copied().unwrap_or(0)
    }

    /// Number of listing requests across all paths
    #[must_use]
    pub fn total_listings(&self) -> usize {
        self.lock().listings.values().sum()
    }

    fn lock(&self) -> MutexGuard<'_, MockFs> {
        self.fs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FileSystemGateway for MockGateway {
    async fn list_directory(&self, path: &str) -> GatewayResult<Vec<DirEntry>> {
        let gate = {
            let mut fs = self.lock();
            *fs.listings.entry(path.to_string()).or_insert(0) += 1;
            fs.gates.remove(path)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.lock()
            .dirs
            .get(path)
            .cloned()
            .unwrap_or_else(|| {
                Err(GatewayError::NotFound {
                    path: path.to_string(),
                })
            })
    }

    async fn read_file(&self, path: &str) -> GatewayResult<String> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_listing_is_counted() {
        let gw = MockGateway::new().with_dir("/proj", vec![DirEntry::file("a.cpp")]);
        assert_eq!(gw.listing_count("/proj"), 0);

        let entries = gw.list_directory("/proj").await.unwrap();
        assert_eq!(entries, vec![DirEntry::file("a.cpp")]);
        assert_eq!(gw.listing_count("/proj"), 1);
        assert_eq!(gw.total_listings(), 1);
    }

    #[tokio::test]
    async fn test_unknown_paths_are_not_found() {
        let gw = MockGateway::new();
        assert!(matches!(
            gw.list_directory("/x").await,
            Err(GatewayError::NotFound { .. })
        ));
        assert!(matches!(
            gw.read_file("/x/y").await,
            Err(GatewayError::NotFound { .. })
        ));
        assert_eq!(gw.listing_count("/x"), 1);
    }

    #[tokio::test]
    async fn test_failure_then_recovery() {
        let gw = MockGateway::new();
        gw.fail_dir("/proj", "disk on fire");
        assert!(gw.list_directory("/proj").await.is_err());

        gw.set_dir("/proj", vec![]);
        assert!(gw.list_directory("/proj").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gate_holds_listing() {
        let gw = Arc::new(MockGateway::new().with_dir("/proj", vec![]));
        let gate = gw.gate("/proj");

        let task = {
            let gw = Arc::clone(&gw);
            tokio::spawn(async move { gw.list_directory("/proj").await })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.notify_one();
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_read_file() {
        let gw = MockGateway::new().with_file("/proj/a.cpp", "x\ny\n");
        assert_eq!(gw.read_file("/proj/a.cpp").await.unwrap(), "x\ny\n");
    }
}
