//! CoverageServer - HTTP Coverage Endpoints
//!
//! ```text
//! GET {base}/coveredLines?path=<abs file>       -> [0|1|2, ...]
//! GET {base}/coverageOverview?path=<abs folder> -> {"selected": [[f, c, u]], "unselected": [...]}
//! ```
//!
//! Any non-2xx status or undecodable body is a [`CoverageFetchError`].

use super::line::FileCoverageSnapshot;
use super::overview::FolderCoverageSummary;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::trace;

/// Default coverage server base URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:7156";

/// Per-file endpoint
pub const COVERED_LINES_ENDPOINT: &str = "coveredLines";

/// Per-folder endpoint
pub const COVERAGE_OVERVIEW_ENDPOINT: &str = "coverageOverview";

/// Errors from a coverage fetch
#[derive(Debug, Error)]
pub enum CoverageFetchError {
    /// Connection or transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("coverage server returned {status} for {endpoint}")]
    Status {
        /// Endpoint name
        endpoint: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// Body did not match the endpoint's schema
    #[error("malformed {endpoint} response: {source}")]
    Malformed {
        /// Endpoint name
        endpoint: &'static str,
        /// Decode error
        #[source]
        source: serde_json::Error,
    },
}

/// Source of coverage data for files and folders
#[async_trait]
pub trait CoverageServer: Send + Sync {
    /// Per-line states for the file at `path`
    async fn covered_lines(&self, path: &str) -> Result<FileCoverageSnapshot, CoverageFetchError>;

    /// Selected/unselected line counts for the folder at `path`
    async fn coverage_overview(
        &self,
        path: &str,
    ) -> Result<FolderCoverageSummary, CoverageFetchError>;
}

/// reqwest-backed coverage server client
#[derive(Debug, Clone)]
pub struct HttpCoverageClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCoverageClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client with a custom reqwest client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Returns the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
    ) -> Result<T, CoverageFetchError> {
        let url = format!("{}/{endpoint}", self.base_url);
        trace!(%url, path, "fetching coverage");

        let resp = self.client.get(&url).query(&[("path", path)]).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoverageFetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| CoverageFetchError::Malformed { endpoint, source })
    }
}

#[async_trait]
impl CoverageServer for HttpCoverageClient {
    async fn covered_lines(&self, path: &str) -> Result<FileCoverageSnapshot, CoverageFetchError> {
        let codes: Vec<i64> = self.get_json(COVERED_LINES_ENDPOINT, path).await?;
        Ok(FileCoverageSnapshot::from_codes(&codes))
    }

    async fn coverage_overview(
        &self,
        path: &str,
    ) -> Result<FolderCoverageSummary, CoverageFetchError> {
        self.get_json(COVERAGE_OVERVIEW_ENDPOINT, path).await
    }
}
