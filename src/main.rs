//! Multi-tenant request router.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                 TENANT ROUTER                     │
//!                     │                                                   │
//!   Client Request    │  ┌────────┐   ┌──────────┐   ┌───────────────┐   │
//!   ──────────────────┼─▶│  http  │──▶│ classify │──▶│ tenant        │   │
//!                     │  │ server │   │ request  │   │ resolution    │   │
//!                     │  └────────┘   └──────────┘   └──────┬────────┘   │
//!                     │                                     ▼            │
//!                     │          isolation scope (enter ── exit always)  │
//!                     │                                     │            │
//!                     │              ┌──────────────────────┼─────────┐  │
//!                     │              ▼                      ▼         │  │
//!                     │     ┌───────────────┐      ┌──────────────┐   │  │
//!                     │     │ control/shell │      │ route table  │   │  │
//!                     │     │  delegation   │      │ match + auth │   │  │
//!                     │     └───────────────┘      └──────┬───────┘   │  │
//!                     │                                   ▼           │  │
//!   Client Response   │                       ┌─────────────────────┐ │  │
//!   ◀─────────────────┼───────────────────────│ static / script     │ │  │
//!                     │                       │ collaborators       │ │  │
//!                     │                       └─────────────────────┘ │  │
//!                     │  ┌─────────────────────────────────────────┐  │  │
//!                     │  │ config · observability · lifecycle      │  │  │
//!                     │  └─────────────────────────────────────────┘  │  │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tenant_router::config::loader::load_config;
use tenant_router::config::watcher::ConfigWatcher;
use tenant_router::config::RouterConfig;
use tenant_router::dispatch::dispatcher::Collaborators;
use tenant_router::http::RouterServer;
use tenant_router::lifecycle::{signals, Shutdown};
use tenant_router::observability::{logging, metrics};
use tenant_router::platform::local::{
    BuiltinControlPlane, DisabledScriptRunner, DisabledShell, HeaderIdentity, LocalTreeProvider,
};
use tenant_router::tenant::namespace::TaskLocalNamespaces;
use tenant_router::tenant::sticky::{DisabledStickyStore, InMemoryStickyStore, StickyTenantStore};

#[derive(Parser)]
#[command(name = "tenant-router", version, about = "Multi-tenant request router")]
struct Args {
    /// Path to the deployment configuration file.
    #[arg(long, default_value = "router.toml")]
    config: PathBuf,

    /// Root directory holding per-tenant source trees.
    #[arg(long, default_value = "tenants")]
    tree_root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_exists = args.config.exists();
    let config = if config_exists {
        load_config(&args.config)?
    } else {
        RouterConfig::default()
    };

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tenant-router starting");
    if !config_exists {
        tracing::warn!(path = ?args.config, "No config file found, using defaults");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        control_prefix = %config.platform.control_prefix,
        dev_mode = config.platform.dev_mode,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // the unsynchronized in-memory slot is wired only for dev deployments
    let sticky: Arc<dyn StickyTenantStore> = if config.platform.sticky_fallback {
        Arc::new(InMemoryStickyStore::default())
    } else {
        Arc::new(DisabledStickyStore)
    };

    let collaborators = Collaborators {
        trees: Arc::new(LocalTreeProvider::new(&args.tree_root)),
        scripts: Arc::new(DisabledScriptRunner),
        identity: Arc::new(HeaderIdentity),
        control: Arc::new(BuiltinControlPlane),
        shell: Arc::new(DisabledShell),
        namespaces: Arc::new(TaskLocalNamespaces),
        sticky,
    };

    let server = RouterServer::new(&config, collaborators);

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::watch_signals(&signal_shutdown).await;
    });

    // hot reload of the deployment config; the watcher handle must stay alive
    let mut _watcher = None;
    let config_updates = if config_exists {
        let (watcher, updates) = ConfigWatcher::new(&args.config);
        match watcher.run() {
            Ok(handle) => {
                _watcher = Some(handle);
                updates
            }
            Err(e) => {
                tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled");
                mpsc::unbounded_channel().1
            }
        }
    } else {
        mpsc::unbounded_channel().1
    };

    if let Some(tls) = &config.listener.tls {
        let addr: std::net::SocketAddr = config.listener.bind_address.parse()?;
        let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain_handle = handle.clone();
        let mut shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = shutdown_rx.recv().await;
            drain_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        let platform = server.platform();
        let mut updates = config_updates;
        tokio::spawn(async move {
            while let Some(new_config) = updates.recv().await {
                platform.store(Arc::new(new_config.platform));
                tracing::info!("Platform configuration swapped");
            }
        });

        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(server.app().into_make_service())
            .await?;
    } else {
        let listener = TcpListener::bind(&config.listener.bind_address).await?;
        server
            .run(listener, config_updates, shutdown.subscribe())
            .await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
