//! Error types for the CLI

use covview::{ConfigError, CovviewError, TreeError};
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// covview library error
    #[error("{0}")]
    Covview(#[from] CovviewError),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<TreeError> for CliError {
    fn from(err: TreeError) -> Self {
        Self::Covview(err.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use covview::{GatewayError, NodeId};

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("bad arg");
        assert!(err.to_string().contains("Invalid argument"));
        assert!(err.to_string().contains("bad arg"));
    }

    #[test]
    fn test_tree_error_conversion() {
        let err: CliError = TreeError::NotABranch {
            id: NodeId::from("root-0"),
        }
        .into();
        assert!(matches!(err, CliError::Covview(CovviewError::Tree(_))));
        assert!(err.to_string().contains("root-0"));
    }

    #[test]
    fn test_library_errors_display_unchanged() {
        let err: CliError = CovviewError::Gateway(GatewayError::NotFound {
            path: "/x".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "no such file or directory: /x");
    }

    #[test]
    fn test_config_error_prefix() {
        let err: CliError = ConfigError::Invalid {
            field: "poll_interval_ms",
            message: "must be greater than zero".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid poll_interval_ms: must be greater than zero"
        );
    }
}
