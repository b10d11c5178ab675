//! OS signal handling.

use crate::lifecycle::shutdown::Shutdown;

/// Wait for SIGTERM or Ctrl+C and trigger shutdown.
pub async fn watch_signals(shutdown: &Shutdown) {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                return;
            }
        };
        tokio::select! {
            _ = ctrl_c => tracing::info!("Ctrl+C received"),
            _ = sigterm.recv() => tracing::info!("SIGTERM received"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        tracing::info!("Ctrl+C received");
    }

    shutdown.trigger();
}
