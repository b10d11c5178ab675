//! Top-level request orchestration.
//!
//! # Responsibilities
//! - Classify control vs shell vs target-application requests
//! - Resolve and validate the owning tenant
//! - Establish the per-tenant isolation scope for the rest of the request
//! - Run route matching, the secure-redirect check and authorization
//! - Dispatch to the static or script collaborator, or emit an error page
//!
//! # Design Decisions
//! - The isolation scope is a Drop guard held across the whole decision,
//!   so teardown runs exactly once on every exit path; the underlying
//!   slot is task-local, so overlapping requests cannot clobber it
//! - Tenant-agnostic control endpoints skip tenant resolution entirely
//! - The route table is re-read from the tree on each request

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::Response;

use crate::authz::gate::{authorize, AuthorizationDecision};
use crate::authz::identity::{CallerIdentity, IdentityProvider};
use crate::config::PlatformConfig;
use crate::dispatch::classify::{classify, RequestClass};
use crate::dispatch::error::DispatchError;
use crate::dispatch::respond;
use crate::dispatch::signals::RequestSignals;
use crate::platform::control::{ControlPlane, ShellBackend};
use crate::platform::script::{ScriptError, ScriptRunner};
use crate::platform::tree::{Tree, TreeProvider};
use crate::routes::matcher::find_rule;
use crate::routes::rule::{RouteRule, SecurityLevel};
use crate::routes::table::{RouteTable, CONFIG_DOC_PATH};
use crate::tenant::namespace::{NamespaceManager, ScopeGuard, TenantId};
use crate::tenant::resolver::TenantResolver;
use crate::tenant::sticky::StickyTenantStore;

/// The external collaborators one dispatcher instance drives.
pub struct Collaborators {
    pub trees: Arc<dyn TreeProvider>,
    pub scripts: Arc<dyn ScriptRunner>,
    pub identity: Arc<dyn IdentityProvider>,
    pub control: Arc<dyn ControlPlane>,
    pub shell: Arc<dyn ShellBackend>,
    pub namespaces: Arc<dyn NamespaceManager>,
    pub sticky: Arc<dyn StickyTenantStore>,
}

/// Orchestrates one deterministic routing decision per request.
pub struct Dispatcher {
    platform: Arc<ArcSwap<PlatformConfig>>,
    resolver: TenantResolver,
    trees: Arc<dyn TreeProvider>,
    scripts: Arc<dyn ScriptRunner>,
    identity: Arc<dyn IdentityProvider>,
    control: Arc<dyn ControlPlane>,
    shell: Arc<dyn ShellBackend>,
    namespaces: Arc<dyn NamespaceManager>,
}

impl Dispatcher {
    pub fn new(platform: Arc<ArcSwap<PlatformConfig>>, collaborators: Collaborators) -> Self {
        Self {
            platform,
            resolver: TenantResolver::new(collaborators.sticky),
            trees: collaborators.trees,
            scripts: collaborators.scripts,
            identity: collaborators.identity,
            control: collaborators.control,
            shell: collaborators.shell,
            namespaces: collaborators.namespaces,
        }
    }

    /// Decide and produce the response for one request.
    ///
    /// The whole decision runs inside its own namespace scope, so the
    /// collaborators' view of the active namespace is per-request even
    /// when many requests are in flight.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        crate::tenant::namespace::scoped(self.dispatch_inner(request)).await
    }

    async fn dispatch_inner(&self, request: Request<Body>) -> Response {
        let platform = self.platform.load_full();
        let signals = RequestSignals::extract(&request, &platform);
        let class = classify(&signals.path, &platform);

        // some control endpoints are tenant-agnostic and must not trigger
        // namespace validation
        let requires_namespace = match class {
            RequestClass::Control => self.control.requires_namespace(&signals.path),
            RequestClass::ShellSession | RequestClass::TargetApp => true,
        };

        let namespace = if requires_namespace {
            match self.resolver.resolve(&signals, &platform) {
                Some(raw) => match TenantId::new(raw) {
                    Ok(id) => Some(id),
                    Err(e) => return DispatchError::from(e).into_response(),
                },
                None => None,
            }
        } else {
            None
        };

        tracing::debug!(
            class = class.as_str(),
            tenant = namespace.as_ref().map(TenantId::as_str),
            path = %signals.path,
            "Dispatching request"
        );

        // held for the rest of the request; Drop restores the prior value
        let _scope = ScopeGuard::enter(self.namespaces.clone(), namespace.clone());

        match class {
            RequestClass::Control => {
                let tree = self
                    .control
                    .requires_tree(&signals.path)
                    .then(|| self.trees.tree_for(namespace.as_ref()));
                self.control.handle(request, tree, namespace.as_ref()).await
            }
            RequestClass::ShellSession => {
                let tree = self.trees.tree_for(namespace.as_ref());
                self.shell.handle(request, tree, namespace.as_ref()).await
            }
            RequestClass::TargetApp => {
                let tree = self.trees.tree_for(namespace.as_ref());
                self.run_target_app(request.headers(), tree, &signals, &platform, namespace.as_ref())
                    .await
                    .unwrap_or_else(DispatchError::into_response)
            }
        }
    }

    /// Target-application handling: route table, redirect, authorization,
    /// then static or script dispatch.
    async fn run_target_app(
        &self,
        headers: &HeaderMap,
        tree: Arc<dyn Tree>,
        signals: &RequestSignals,
        platform: &PlatformConfig,
        namespace: Option<&TenantId>,
    ) -> Result<Response, DispatchError> {
        let raw = tree
            .get_file_contents(CONFIG_DOC_PATH)
            .await
            .ok_or(DispatchError::ConfigMissing(CONFIG_DOC_PATH))?;
        let table = RouteTable::parse(&raw)?;
        let rule = find_rule(&table, &signals.path)
            .ok_or_else(|| DispatchError::RouteNotFound(signals.path.clone()))?;

        // in production, secure-always handlers redirect to https before
        // authorization or dispatch run
        if rule.secure() == SecurityLevel::Always
            && !platform.dev_mode
            && signals.scheme != "https"
        {
            return Ok(respond::redirect(&signals.current_url(true)));
        }

        // one identity lookup per request; reused for denial messaging
        let caller = self.identity.current_user(headers);
        if authorize(rule.login(), &caller, signals.system_originated)
            == AuthorizationDecision::Deny
        {
            let destination = signals.current_url(false);
            return Ok(match &caller {
                CallerIdentity::Anonymous => {
                    respond::forbidden_anonymous(&self.identity.create_login_url(&destination))
                }
                CallerIdentity::User { name, .. } => {
                    respond::forbidden_user(name, &self.identity.create_logout_url(&destination))
                }
            });
        }

        match rule {
            RouteRule::Static {
                file_path,
                mime_type,
                expiration_secs,
                ..
            } => {
                tracing::info!(file = %file_path, "Serving static file");
                let data = tree
                    .get_file_contents(file_path)
                    .await
                    .ok_or_else(|| DispatchError::RouteNotFound(file_path.clone()))?;
                let content_type = mime_type
                    .as_deref()
                    .unwrap_or_else(|| respond::guess_mime(file_path));
                Ok(respond::static_file(data, content_type, *expiration_secs))
            }
            RouteRule::Script { script_path, .. } => {
                tracing::info!(script = %script_path, "Running script");
                match self.scripts.run(script_path, tree.as_ref(), namespace).await {
                    Ok(response) => Ok(response),
                    Err(ScriptError::NotFound(path)) => Err(DispatchError::ScriptNotFound(path)),
                    Err(ScriptError::Failed(message)) => {
                        tracing::error!(script = %script_path, error = %message, "Script failed");
                        Ok(respond::plain(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            format!("Error: {message}"),
                        ))
                    }
                }
            }
        }
    }
}
