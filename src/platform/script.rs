//! Script execution contract.

use async_trait::async_trait;
use axum::response::Response;
use thiserror::Error;

use crate::platform::tree::Tree;
use crate::tenant::TenantId;

/// Failure modes the runner reports back to the dispatcher.
///
/// Anything the sandbox can translate into a response itself is returned
/// as `Ok`; only outcomes the dispatcher must map to its own error pages
/// surface here.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("could not find script {0}")]
    NotFound(String),

    #[error("script execution failed: {0}")]
    Failed(String),
}

/// The sandboxed script executor.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run a tenant script and produce its response.
    ///
    /// Invoked inside the request's isolation scope; the runner observes
    /// the active namespace through the platform's namespace manager.
    async fn run(
        &self,
        script_path: &str,
        tree: &dyn Tree,
        namespace: Option<&TenantId>,
    ) -> Result<Response, ScriptError>;
}
