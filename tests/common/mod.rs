//! Shared fixtures for integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};

use tenant_router::config::PlatformConfig;
use tenant_router::dispatch::dispatcher::{Collaborators, Dispatcher};
use tenant_router::platform::local::{BuiltinControlPlane, DisabledShell, HeaderIdentity};
use tenant_router::platform::script::{ScriptError, ScriptRunner};
use tenant_router::platform::tree::{Tree, TreeProvider};
use tenant_router::tenant::namespace::{NamespaceManager, TaskLocalNamespaces, TenantId};
use tenant_router::tenant::sticky::DisabledStickyStore;

/// In-memory tree provider: one file map per namespace.
#[derive(Default)]
pub struct MemoryTrees {
    namespaces: HashMap<String, HashMap<String, Bytes>>,
}

impl MemoryTrees {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to a namespace; `""` is the default namespace.
    pub fn with_file(mut self, namespace: &str, path: &str, contents: &str) -> Self {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(path.to_string(), Bytes::from(contents.to_string()));
        self
    }
}

impl TreeProvider for MemoryTrees {
    fn tree_for(&self, namespace: Option<&TenantId>) -> Arc<dyn Tree> {
        let key = namespace.map(TenantId::as_str).unwrap_or("");
        Arc::new(MemoryTree {
            files: self.namespaces.get(key).cloned().unwrap_or_default(),
        })
    }
}

pub struct MemoryTree {
    files: HashMap<String, Bytes>,
}

#[async_trait]
impl Tree for MemoryTree {
    async fn get_file_contents(&self, path: &str) -> Option<Bytes> {
        self.files.get(path).cloned()
    }
}

/// Script runner serving canned responses by script path.
#[derive(Default)]
pub struct CannedScripts {
    responses: HashMap<String, String>,
}

impl CannedScripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, script_path: &str, body: &str) -> Self {
        self.responses
            .insert(script_path.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl ScriptRunner for CannedScripts {
    async fn run(
        &self,
        script_path: &str,
        _tree: &dyn Tree,
        _namespace: Option<&TenantId>,
    ) -> Result<Response, ScriptError> {
        match self.responses.get(script_path) {
            Some(body) => Ok((StatusCode::OK, body.clone()).into_response()),
            None => Err(ScriptError::NotFound(script_path.to_string())),
        }
    }
}

/// Script runner that panics, for scope-teardown tests.
pub struct PanickingScripts;

#[async_trait]
impl ScriptRunner for PanickingScripts {
    async fn run(
        &self,
        _script_path: &str,
        _tree: &dyn Tree,
        _namespace: Option<&TenantId>,
    ) -> Result<Response, ScriptError> {
        panic!("script runner blew up");
    }
}

/// Script runner that reports the namespace it observes through the
/// platform's namespace manager, after yielding so concurrent requests
/// interleave.
pub struct ScopeEchoScripts {
    pub namespaces: TaskLocalNamespaces,
}

#[async_trait]
impl ScriptRunner for ScopeEchoScripts {
    async fn run(
        &self,
        _script_path: &str,
        _tree: &dyn Tree,
        _namespace: Option<&TenantId>,
    ) -> Result<Response, ScriptError> {
        tokio::task::yield_now().await;
        let observed = self
            .namespaces
            .current()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default();
        Ok((StatusCode::OK, observed).into_response())
    }
}

/// Build a dispatcher over in-memory collaborators.
pub fn build_dispatcher(
    platform: PlatformConfig,
    trees: MemoryTrees,
    scripts: Arc<dyn ScriptRunner>,
) -> Arc<Dispatcher> {
    let collaborators = Collaborators {
        trees: Arc::new(trees),
        scripts,
        identity: Arc::new(HeaderIdentity),
        control: Arc::new(BuiltinControlPlane),
        shell: Arc::new(DisabledShell),
        namespaces: Arc::new(TaskLocalNamespaces),
        sticky: Arc::new(DisabledStickyStore),
    };
    let dispatcher = Dispatcher::new(Arc::new(ArcSwap::from_pointee(platform)), collaborators);
    Arc::new(dispatcher)
}

/// A tenant-addressed GET request.
pub fn get(path_and_query: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(path_and_query).method("GET");
    if !headers.iter().any(|(name, _)| *name == "host") {
        builder = builder.header("host", "localhost");
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Collect a response body as a string.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// An app.yaml document used across tests.
pub const DEMO_APP_YAML: &str = "\
application: demo
handlers:
- url: /static/*
  static_files: static/page.html
  expiration: 10m
- url: /styled.css
  static_files: assets/styled.css
  mime_type: text/css
- url: /admin*
  script: admin.app
  login: admin
- url: /private
  script: private.app
  login: required
- url: /pay
  script: pay.app
  secure: always
- url: /*
  script: main.app
";
