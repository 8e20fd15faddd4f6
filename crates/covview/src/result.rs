//! Result and error types for covview.

use crate::config::ConfigError;
use crate::coverage::CoverageFetchError;
use crate::tree::{GatewayError, TreeError};
use thiserror::Error;

/// Result type for covview operations
pub type CovviewResult<T> = Result<T, CovviewError>;

/// Errors that can occur in covview
#[derive(Debug, Error)]
pub enum CovviewError {
    /// Tree operation failed
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// File read failed
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// One-shot coverage fetch failed
    #[error("coverage fetch failed: {0}")]
    Coverage(#[from] CoverageFetchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Nothing is selected
    #[error("no file or folder is selected")]
    NoSelection,

    /// Selection is not of the kind the operation needs
    #[error("{path} is not a {expected}")]
    WrongTargetKind {
        /// Selected path
        path: String,
        /// "file" or "folder"
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_errors_keep_their_message() {
        let err: CovviewError = TreeError::Gateway(GatewayError::NotFound {
            path: "/proj".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "no such file or directory: /proj");
    }

    #[test]
    fn test_coverage_error_is_prefixed() {
        let err: CovviewError = CoverageFetchError::Status {
            endpoint: "coveredLines",
            status: 503,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "coverage fetch failed: coverage server returned 503 for coveredLines"
        );
    }

    #[test]
    fn test_wrong_kind_message() {
        let err = CovviewError::WrongTargetKind {
            path: "/proj/lib".to_string(),
            expected: "file",
        };
        assert_eq!(err.to_string(), "/proj/lib is not a file");
    }
}
