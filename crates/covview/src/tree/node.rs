//! Tree node types: ids, kinds and the node record itself.

use super::gateway::DirEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, session-stable node identifier.
///
/// Child ids are derived from the parent id and the child's ordinal in the
/// listing (`root-1-0`), so an id always names the same path for the life of
/// the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Id of the virtual root node
    pub const ROOT: &'static str = "root";

    /// Wrap an existing id string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The root id
    #[must_use]
    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    /// Id of the child at `ordinal` in this node's listing
    #[must_use]
    pub fn child(&self, ordinal: usize) -> Self {
        Self(format!("{}-{}", self.0, ordinal))
    }

    /// Borrow as `&str`
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What a node is, and for branches, how far it has been materialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// A file
    Leaf {
        /// Absolute path
        full_path: String,
    },
    /// A folder
    Branch {
        /// Absolute path
        full_path: String,
        /// Children in listing order; empty until loaded
        children: Vec<NodeId>,
        /// Whether the listing has been applied
        loaded: bool,
    },
}

/// A single entry of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Node id
    pub id: NodeId,
    /// Display name (last path segment)
    pub name: String,
    /// Parent id, `None` only for the root
    pub parent: Option<NodeId>,
    /// Leaf or branch payload
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl TreeNode {
    /// Create the unloaded root branch for `path`
    #[must_use]
    pub fn root(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let name = trimmed
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(path)
            .to_string();
        Self {
            id: NodeId::root(),
            name,
            parent: None,
            kind: NodeKind::Branch {
                full_path: path.to_string(),
                children: Vec::new(),
                loaded: false,
            },
        }
    }

    /// Create the node for `entry` at position `ordinal` under `parent`
    #[must_use]
    pub fn from_entry(parent: &Self, ordinal: usize, entry: &DirEntry) -> Self {
        let full_path = join_path(parent.full_path(), &entry.name);
        let kind = if entry.is_folder {
            NodeKind::Branch {
                full_path,
                children: Vec::new(),
                loaded: false,
            }
        } else {
            NodeKind::Leaf { full_path }
        };
        Self {
            id: parent.id.child(ordinal),
            name: entry.name.clone(),
            parent: Some(parent.id.clone()),
            kind,
        }
    }

    /// Absolute path of the file or folder
    #[must_use]
    pub fn full_path(&self) -> &str {
        match &self.kind {
            NodeKind::Leaf { full_path } | NodeKind::Branch { full_path, .. } => full_path,
        }
    }

    /// Whether this node is a folder
    #[must_use]
    pub const fn is_branch(&self) -> bool {
        matches!(self.kind, NodeKind::Branch { .. })
    }

    /// Whether this is a branch whose listing has been applied
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.kind, NodeKind::Branch { loaded: true, .. })
    }

    /// Child ids; empty for leaves and unloaded branches
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Branch { children, .. } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// File extension of a leaf, empty when there is none or for branches
    #[must_use]
    pub fn extension(&self) -> &str {
        if self.is_branch() {
            return "";
        }
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext,
            _ => "",
        }
    }
}

/// `parent + "/" + name`, without doubling a trailing separator
fn join_path(parent: &str, name: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), name)
}
