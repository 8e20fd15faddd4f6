//! TreeStore - Lazily Expanded Source Tree
//!
//! Owns a flat table of [`TreeNode`]s. Only the root exists at start; every
//! other node is created the first time its parent is expanded.
//!
//! ```text
//! expand(id)
//!   │
//!   ├─ loaded?            ──► Ok(()) (no request)
//!   ├─ in flight?         ──► await the pending listing
//!   └─ otherwise          ──► list_directory(full_path), record as pending
//!                              │
//!                              ├─ Ok(entries) ─► append children, loaded = true
//!                              └─ Err(e)      ─► stays unloaded, every waiter gets e
//! ```
//!
//! The lock guarding the table is never held across an await; ordering of
//! the short critical sections gives at-most-once listing per node.

use super::gateway::{DirEntry, FileSystemGateway, GatewayError, GatewayResult};
use super::node::{NodeId, NodeKind, TreeNode};
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from tree operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// No node has this id
    #[error("unknown tree node '{id}'")]
    UnknownNode {
        /// Requested id
        id: NodeId,
    },

    /// Node is a file and cannot be expanded
    #[error("tree node '{id}' is a file and cannot be expanded")]
    NotABranch {
        /// Requested id
        id: NodeId,
    },

    /// Directory listing failed; the node stays unloaded
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Listing shared by every caller expanding the same node
type PendingListing = Shared<BoxFuture<'static, GatewayResult<Vec<DirEntry>>>>;

/// One row of a flattened tree, depth-first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRow {
    /// Node id
    pub id: NodeId,
    /// Distance from the root (root is 0)
    pub depth: usize,
    /// Display name
    pub name: String,
    /// Absolute path
    pub full_path: String,
    /// Whether the node is a folder
    pub is_branch: bool,
    /// Whether the node's children follow this row
    pub is_open: bool,
}

struct TreeTable {
    nodes: Vec<TreeNode>,
    index: HashMap<NodeId, usize>,
    in_flight: HashMap<NodeId, PendingListing>,
}

impl TreeTable {
    fn get(&self, id: &NodeId) -> Option<&TreeNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Apply a listing to an unloaded branch. A second successful listing
    /// for an already loaded node is ignored.
    fn attach_children(&mut self, id: &NodeId, entries: &[DirEntry]) -> usize {
        let Some(&parent_idx) = self.index.get(id) else {
            return 0;
        };
        let parent = &self.nodes[parent_idx];
        if parent.is_loaded() {
            return 0;
        }

        let children: Vec<TreeNode> = entries
            .iter()
            .enumerate()
            .map(|(ordinal, entry)| TreeNode::from_entry(parent, ordinal, entry))
            .collect();
        let ids: Vec<NodeId> = children.iter().map(|c| c.id.clone()).collect();

        for child in children {
            self.index.insert(child.id.clone(), self.nodes.len());
            self.nodes.push(child);
        }
        if let NodeKind::Branch {
            children, loaded, ..
        } = &mut self.nodes[parent_idx].kind
        {
            *children = ids;
            *loaded = true;
        }
        entries.len()
    }
}

/// Lazily expanded directory tree
pub struct TreeStore {
    gateway: Arc<dyn FileSystemGateway>,
    root: NodeId,
    table: Mutex<TreeTable>,
}

impl fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStore")
            .field("root", &self.root)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl TreeStore {
    /// Create a store whose root is the folder at `root_path`
    #[must_use]
    pub fn new(gateway: Arc<dyn FileSystemGateway>, root_path: &str) -> Self {
        let root = TreeNode::root(root_path);
        let root_id = root.id.clone();
        let mut index = HashMap::new();
        index.insert(root_id.clone(), 0);
        Self {
            gateway,
            root: root_id,
            table: Mutex::new(TreeTable {
                nodes: vec![root],
                index,
                in_flight: HashMap::new(),
            }),
        }
    }

    /// Id of the root node
    #[must_use]
    pub fn root_id(&self) -> &NodeId {
        &self.root
    }

    /// Snapshot of a node
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<TreeNode> {
        self.lock().get(id).cloned()
    }

    /// Snapshots of a node's children, in listing order
    #[must_use]
    pub fn children(&self, id: &NodeId) -> Vec<TreeNode> {
        let table = self.lock();
        table
            .get(id)
            .map(|node| {
                node.children()
                    .iter()
                    .filter_map(|child| table.get(child).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First materialized node whose full path is `path`
    #[must_use]
    pub fn node_by_path(&self, path: &str) -> Option<TreeNode> {
        self.lock()
            .nodes
            .iter()
            .find(|node| node.full_path() == path)
            .cloned()
    }

    /// Number of materialized nodes, root included
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Always false: the root exists from construction
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().nodes.is_empty()
    }

    /// Whether a listing for `id` is currently pending
    #[must_use]
    pub fn is_in_flight(&self, id: &NodeId) -> bool {
        self.lock().in_flight.contains_key(id)
    }

    /// Materialize the children of branch `id`.
    ///
    /// Idempotent once loaded. Concurrent calls for the same node share one
    /// listing request and all observe its result.
    pub async fn expand(&self, id: &NodeId) -> Result<(), TreeError> {
        let Some(pending) = self.begin_listing(id)? else {
            return Ok(());
        };
        let listing = pending.clone().await;
        self.finish_listing(id, &pending, listing)
    }

    /// Expand breadth-first from the root down to `depth` levels.
    ///
    /// Siblings at the same level are listed concurrently. Failed branches
    /// are skipped and their errors returned.
    pub async fn expand_depth(&self, depth: usize) -> Vec<TreeError> {
        let mut frontier = vec![self.root.clone()];
        let mut failures = Vec::new();

        for _ in 0..depth {
            if frontier.is_empty() {
                break;
            }
            let results = join_all(frontier.iter().map(|id| self.expand(id))).await;

            let mut next = Vec::new();
            for (id, result) in frontier.iter().zip(results) {
                match result {
                    Ok(()) => next.extend(
                        self.children(id)
                            .into_iter()
                            .filter(TreeNode::is_branch)
                            .map(|node| node.id),
                    ),
                    Err(err) => failures.push(err),
                }
            }
            frontier = next;
        }
        failures
    }

    /// Rows for a tree widget; children are shown only for loaded branches
    /// in `open`
    #[must_use]
    pub fn visible_rows(&self, open: &HashSet<NodeId>) -> Vec<TreeRow> {
        self.rows_where(|id| open.contains(id))
    }

    /// Rows with every loaded branch open
    #[must_use]
    pub fn loaded_rows(&self) -> Vec<TreeRow> {
        self.rows_where(|_| true)
    }

    fn rows_where(&self, is_open: impl Fn(&NodeId) -> bool) -> Vec<TreeRow> {
        let table = self.lock();
        let mut rows = Vec::new();
        let mut stack = vec![(self.root.clone(), 0_usize)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = table.get(&id) else {
                continue;
            };
            let open = node.is_loaded() && is_open(&id);
            rows.push(TreeRow {
                id: node.id.clone(),
                depth,
                name: node.name.clone(),
                full_path: node.full_path().to_string(),
                is_branch: node.is_branch(),
                is_open: open,
            });
            if open {
                stack.extend(
                    node.children()
                        .iter()
                        .rev()
                        .map(|child| (child.clone(), depth + 1)),
                );
            }
        }
        rows
    }

    /// Validate `id` and either join or start its listing.
    /// `None` means the node is already loaded.
    fn begin_listing(&self, id: &NodeId) -> Result<Option<PendingListing>, TreeError> {
        let mut table = self.lock();
        let node = table
            .get(id)
            .ok_or_else(|| TreeError::UnknownNode { id: id.clone() })?;

        let full_path = match &node.kind {
            NodeKind::Leaf { .. } => return Err(TreeError::NotABranch { id: id.clone() }),
            NodeKind::Branch { loaded: true, .. } => return Ok(None),
            NodeKind::Branch { full_path, .. } => full_path.clone(),
        };

        if let Some(pending) = table.in_flight.get(id) {
            debug!(node = %id, "joining in-flight listing");
            return Ok(Some(pending.clone()));
        }

        debug!(node = %id, path = %full_path, "listing directory");
        let gateway = Arc::clone(&self.gateway);
        let pending = async move { gateway.list_directory(&full_path).await }
            .boxed()
            .shared();
        table.in_flight.insert(id.clone(), pending.clone());
        Ok(Some(pending))
    }

    fn finish_listing(
        &self,
        id: &NodeId,
        pending: &PendingListing,
        listing: GatewayResult<Vec<DirEntry>>,
    ) -> Result<(), TreeError> {
        let mut table = self.lock();
        if table
            .in_flight
            .get(id)
            .is_some_and(|current| current.ptr_eq(pending))
        {
            table.in_flight.remove(id);
        }

        match listing {
            Ok(entries) => {
                let added = table.attach_children(id, &entries);
                if added > 0 {
                    debug!(node = %id, children = added, "expanded");
                }
                Ok(())
            }
            Err(err) => {
                warn!(node = %id, error = %err, "directory listing failed");
                Err(TreeError::Gateway(err))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, TreeTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
