//! Hot reload of the deployment configuration file.
//!
//! Editors and config-management tools typically emit bursts of filesystem
//! events for one logical save; a reload window collapses each burst into
//! a single reload. A reload that fails to parse or validate is logged and
//! dropped, leaving the active configuration in place.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Events closer together than this are treated as one save.
const RELOAD_WINDOW: Duration = Duration::from_millis(500);

/// Watches the deployment configuration file and pushes successfully
/// reloaded configurations to the server.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Pair a watcher with the receiver the server consumes updates from.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive for the
    /// watch to stay active.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let watched = path.clone();
        let mut debounce = Debounce::new(RELOAD_WINDOW);

        let mut watcher = RecommendedWatcher::new(
            move |outcome: notify::Result<Event>| match outcome {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    if !debounce.ready() {
                        return;
                    }
                    match load_config(&path) {
                        Ok(config) => {
                            tracing::info!(path = ?path, "Deployment configuration reloaded");
                            let _ = update_tx.send(config);
                        }
                        Err(e) => tracing::warn!(
                            error = %e,
                            "Reload rejected, keeping the active configuration"
                        ),
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Configuration watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?watched, "Watching deployment configuration");
        Ok(watcher)
    }
}

/// Collapses event bursts: the first event in a window passes, the rest
/// are absorbed.
struct Debounce {
    window: Duration,
    last_pass: Option<Instant>,
}

impl Debounce {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_pass: None,
        }
    }

    fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last_pass {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_pass = Some(now);
                true
            }
        }
    }
}
