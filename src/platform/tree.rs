//! Tenant source-tree contract.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::tenant::TenantId;

/// Read access to one tenant's source files.
#[async_trait]
pub trait Tree: Send + Sync {
    /// File contents, or `None` when the file does not exist.
    ///
    /// Missing files are a normal outcome, not an error.
    async fn get_file_contents(&self, path: &str) -> Option<Bytes>;
}

/// Constructs the tree for a namespace.
///
/// `None` is the default namespace (no tenant resolved).
pub trait TreeProvider: Send + Sync {
    fn tree_for(&self, namespace: Option<&TenantId>) -> Arc<dyn Tree>;
}
