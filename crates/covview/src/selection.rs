//! The selection target: what the viewer displays and polls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a target is a single file or a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Polled through `coveredLines`
    File,
    /// Polled through `coverageOverview`
    Folder,
}

/// The file or folder currently selected for display and polling
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionTarget {
    /// Absolute path
    pub path: String,
    /// File or folder
    pub kind: TargetKind,
}

impl SelectionTarget {
    /// Select a file
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::File,
        }
    }

    /// Select a folder
    #[must_use]
    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::Folder,
        }
    }

    /// Whether the target is a folder
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, TargetKind::Folder)
    }
}

impl fmt::Display for SelectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_folder() {
            write!(f, "{}/", self.path.trim_end_matches('/'))
        } else {
            f.write_str(&self.path)
        }
    }
}
