//! Baseline collaborator implementations wired by the binary.
//!
//! # Responsibilities
//! - Serve tenant trees from a local directory, one subdirectory per
//!   namespace
//! - Derive caller identity from trusted front-end headers
//! - Provide the minimal built-in control endpoints (status, file fetch)
//!
//! # Design Decisions
//! - These are composition-root defaults, not part of the dispatch core;
//!   real deployments substitute their own collaborators
//! - The local tree rejects path traversal instead of resolving it

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::authz::identity::{CallerIdentity, IdentityProvider};
use crate::platform::control::{ControlPlane, ShellBackend};
use crate::platform::script::{ScriptError, ScriptRunner};
use crate::platform::tree::{Tree, TreeProvider};
use crate::tenant::TenantId;

/// Header naming the authenticated user, set by a trusted front end.
pub const X_AUTHENTICATED_USER: &str = "x-authenticated-user";
/// Header marking the authenticated user as an administrator.
pub const X_AUTHENTICATED_ADMIN: &str = "x-authenticated-admin";

/// Serves per-namespace trees from subdirectories of a root directory.
pub struct LocalTreeProvider {
    root: PathBuf,
}

impl LocalTreeProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TreeProvider for LocalTreeProvider {
    fn tree_for(&self, namespace: Option<&TenantId>) -> Arc<dyn Tree> {
        let dir = match namespace {
            Some(ns) => self.root.join(ns.as_str()),
            None => self.root.join("_default"),
        };
        Arc::new(LocalTree { dir })
    }
}

/// One namespace's files on local disk.
pub struct LocalTree {
    dir: PathBuf,
}

#[async_trait]
impl Tree for LocalTree {
    async fn get_file_contents(&self, path: &str) -> Option<Bytes> {
        if !is_plain_relative(Path::new(path)) {
            tracing::warn!(path = %path, "Rejected tree path");
            return None;
        }
        tokio::fs::read(self.dir.join(path)).await.ok().map(Bytes::from)
    }
}

/// Only plain relative paths reach the filesystem.
fn is_plain_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Identity derived from trusted front-end headers.
pub struct HeaderIdentity;

impl IdentityProvider for HeaderIdentity {
    fn current_user(&self, headers: &HeaderMap) -> CallerIdentity {
        let name = headers
            .get(X_AUTHENTICATED_USER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty());
        match name {
            Some(name) => CallerIdentity::User {
                name: name.to_string(),
                admin: headers
                    .get(X_AUTHENTICATED_ADMIN)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
            },
            None => CallerIdentity::Anonymous,
        }
    }

    fn create_login_url(&self, destination: &str) -> String {
        format!("/_login?{}", continue_param(destination))
    }

    fn create_logout_url(&self, destination: &str) -> String {
        format!("/_logout?{}", continue_param(destination))
    }
}

fn continue_param(destination: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("continue", destination)
        .finish()
}

/// Minimal built-in control plane: a status endpoint and a raw file fetch.
pub struct BuiltinControlPlane;

#[async_trait]
impl ControlPlane for BuiltinControlPlane {
    fn requires_tree(&self, path: &str) -> bool {
        path.ends_with("/file")
    }

    fn requires_namespace(&self, path: &str) -> bool {
        path.ends_with("/file")
    }

    async fn handle(
        &self,
        request: Request<Body>,
        tree: Option<Arc<dyn Tree>>,
        namespace: Option<&TenantId>,
    ) -> Response {
        let path = request.uri().path();
        if path.ends_with("/status") {
            let body = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "status": "operational",
            });
            return (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body.to_string(),
            )
                .into_response();
        }

        if path.ends_with("/file") {
            let Some(tree) = tree else {
                return (StatusCode::INTERNAL_SERVER_ERROR, "no tree for file fetch").into_response();
            };
            let file_path = request
                .uri()
                .query()
                .and_then(|q| {
                    url::form_urlencoded::parse(q.as_bytes())
                        .find(|(k, _)| k == "path")
                        .map(|(_, v)| v.into_owned())
                })
                .unwrap_or_default();
            return match tree.get_file_contents(&file_path).await {
                Some(data) => (StatusCode::OK, data).into_response(),
                None => {
                    tracing::debug!(
                        namespace = namespace.map(TenantId::as_str),
                        path = %file_path,
                        "Control file fetch missed"
                    );
                    (StatusCode::NOT_FOUND, format!("no such file: {file_path}")).into_response()
                }
            };
        }

        (StatusCode::NOT_FOUND, "unknown control endpoint").into_response()
    }
}

/// Shell sessions are not available in the baseline deployment.
pub struct DisabledShell;

#[async_trait]
impl ShellBackend for DisabledShell {
    async fn handle(
        &self,
        _request: Request<Body>,
        _tree: Arc<dyn Tree>,
        _namespace: Option<&TenantId>,
    ) -> Response {
        (StatusCode::NOT_IMPLEMENTED, "shell sessions are not enabled").into_response()
    }
}

/// Script execution is not available in the baseline deployment.
pub struct DisabledScriptRunner;

#[async_trait]
impl ScriptRunner for DisabledScriptRunner {
    async fn run(
        &self,
        _script_path: &str,
        _tree: &dyn Tree,
        _namespace: Option<&TenantId>,
    ) -> Result<Response, ScriptError> {
        Ok((StatusCode::NOT_IMPLEMENTED, "script execution is not enabled").into_response())
    }
}
