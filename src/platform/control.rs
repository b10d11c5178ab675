//! Control-plane and shell collaborator contracts.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::platform::tree::Tree;
use crate::tenant::TenantId;

/// The platform's own management surface.
///
/// Some control endpoints are tenant-agnostic; the two predicates declare
/// per-path whether a tree or a namespace is needed, so the dispatcher can
/// skip tenant resolution (and its validation failures) entirely.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Whether this control path needs access to a tenant tree.
    fn requires_tree(&self, path: &str) -> bool;

    /// Whether this control path needs a resolved namespace.
    fn requires_namespace(&self, path: &str) -> bool;

    async fn handle(
        &self,
        request: Request<Body>,
        tree: Option<Arc<dyn Tree>>,
        namespace: Option<&TenantId>,
    ) -> Response;
}

/// Interactive shell sessions against a tenant's namespace.
#[async_trait]
pub trait ShellBackend: Send + Sync {
    async fn handle(
        &self,
        request: Request<Body>,
        tree: Arc<dyn Tree>,
        namespace: Option<&TenantId>,
    ) -> Response;
}
