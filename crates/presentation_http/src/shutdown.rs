//! Graceful shutdown with a bounded drain period

use std::{future::IntoFuture, sync::Arc, time::Duration};

use tokio::{signal, sync::Notify};
use tracing::{error, info, warn};

/// Wait for shutdown signals (SIGINT, SIGTERM)
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Drive `server` to completion, giving up `grace` after `shutdown` fires
///
/// Returns `None` when the grace period ran out with connections still open.
pub async fn drain_within<F>(
    server: F,
    shutdown: Arc<Notify>,
    grace: Duration,
) -> Option<F::Output>
where
    F: IntoFuture,
{
    let server = server.into_future();
    let deadline = async {
        shutdown.notified().await;
        info!("Waiting up to {:?} for connections to close...", grace);
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        output = server => Some(output),
        () = deadline => {
            warn!(?grace, "Grace period elapsed, dropping open connections");
            None
        }
    }
}
