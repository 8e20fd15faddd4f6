//! FileSystemGateway - Abstract Directory Listing and File Reads
//!
//! The tree never touches the filesystem directly. Every listing and every
//! source read goes through a [`FileSystemGateway`], so the store can be
//! driven by the local disk in production and by [`super::MockGateway`] in
//! tests.
//!
//! ```text
//! ┌──────────────┐  list_directory(path)  ┌────────────────────────┐
//! │  TreeStore   │───────────────────────►│  FileSystemGateway     │
//! │  Session     │◄───────────────────────│  ├─ LocalFsGateway     │
//! └──────────────┘   Vec<DirEntry>        │  └─ MockGateway        │
//!                                         └────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a directory listing, in the order the filesystem returned it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (no path separators)
    pub name: String,
    /// Whether the entry is a folder
    pub is_folder: bool,
}

impl DirEntry {
    /// Create a file entry
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
        }
    }

    /// Create a folder entry
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
        }
    }
}

/// Listing or read failure reported by a gateway.
///
/// Cloneable so a single failed listing can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Path does not exist
    #[error("no such file or directory: {path}")]
    NotFound {
        /// Requested path
        path: String,
    },

    /// Path exists but may not be read
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// Requested path
        path: String,
    },

    /// Any other I/O failure
    #[error("I/O error on {path}: {message}")]
    Io {
        /// Requested path
        path: String,
        /// Underlying error text
        message: String,
    },
}

impl GatewayError {
    /// Classify a `std::io::Error` raised while accessing `path`
    #[must_use]
    pub fn from_io(path: &str, err: &std::io::Error) -> Self {
        let path = path.to_string();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io {
                path,
                message: err.to_string(),
            },
        }
    }

    /// Path the failed operation was addressed to
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path } | Self::PermissionDenied { path } | Self::Io { path, .. } => {
                path
            }
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Directory listing and file reads for absolute paths.
#[async_trait]
pub trait FileSystemGateway: Send + Sync {
    /// List the entries of the directory at `path`, order-preserving
    async fn list_directory(&self, path: &str) -> GatewayResult<Vec<DirEntry>>;

    /// Read the file at `path` as UTF-8 text
    async fn read_file(&self, path: &str) -> GatewayResult<String>;
}
