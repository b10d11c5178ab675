//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router: every path feeds the dispatcher
//! - Wire up middleware (timeout, request ID, tracing)
//! - Swap the platform configuration on hot reload
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{PlatformConfig, RouterConfig};
use crate::dispatch::classify::classify;
use crate::dispatch::dispatcher::{Collaborators, Dispatcher};
use crate::observability::metrics;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub platform: Arc<ArcSwap<PlatformConfig>>,
}

/// HTTP server for the router.
pub struct RouterServer {
    app: Router,
    platform: Arc<ArcSwap<PlatformConfig>>,
}

impl RouterServer {
    /// Create a new server from deployment configuration and collaborators.
    pub fn new(config: &RouterConfig, collaborators: Collaborators) -> Self {
        let platform = Arc::new(ArcSwap::from_pointee(config.platform.clone()));
        let dispatcher = Arc::new(Dispatcher::new(platform.clone(), collaborators));

        let state = AppState {
            dispatcher,
            platform: platform.clone(),
        };
        let app = Self::build_router(config, state);

        Self { app, platform }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Request ids are minted outermost (an inbound `x-request-id` is
    /// kept), propagated onto responses, with tracing in between so log
    /// events carry the id.
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .fallback(route_request)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for serving over a custom transport (e.g. TLS).
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Handle to the hot-swappable platform section.
    pub fn platform(&self) -> Arc<ArcSwap<PlatformConfig>> {
        self.platform.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let platform = self.platform.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                platform.store(Arc::new(new_config.platform));
                tracing::info!("Platform configuration swapped");
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every request feeds the dispatcher; metrics are recorded on the way out.
async fn route_request(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let class = classify(request.uri().path(), &state.platform.load()).as_str();

    let response = state.dispatcher.dispatch(request).await;

    metrics::record_request(&method, response.status().as_u16(), class, start);
    response
}
