//! Source tree: lazily expanded nodes backed by a filesystem gateway.

mod gateway;
mod local;
mod mock;
mod node;
mod store;

pub use gateway::{DirEntry, FileSystemGateway, GatewayError, GatewayResult};
pub use local::LocalFsGateway;
pub use mock::MockGateway;
pub use node::{NodeId, NodeKind, TreeNode};
pub use store::{TreeError, TreeRow, TreeStore};
