//! Local disk gateway backed by `tokio::fs`.

use super::gateway::{DirEntry, FileSystemGateway, GatewayError, GatewayResult};
use async_trait::async_trait;
use tracing::trace;

/// Reads directories and files from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFsGateway;

impl LocalFsGateway {
    /// Create a new local gateway
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystemGateway for LocalFsGateway {
    async fn list_directory(&self, path: &str) -> GatewayResult<Vec<DirEntry>> {
        let mut dir = tokio::fs::read_dir(path)
            .await
            .map_err(|e| GatewayError::from_io(path, &e))?;

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| GatewayError::from_io(path, &e))?
        {
            // Symlinks are reported as files, matching a non-following stat.
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| GatewayError::from_io(path, &e))?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_folder: file_type.is_dir(),
            });
        }

        // read_dir order is platform dependent; listings are sorted by name.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        trace!(path, count = entries.len(), "listed directory");
        Ok(entries)
    }

    async fn read_file(&self, path: &str) -> GatewayResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::from_io(path, &e))
    }
}
