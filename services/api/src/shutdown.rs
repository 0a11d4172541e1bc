//! Graceful shutdown for the HTTP server.

use std::future::Future;
use tracing::{error, info};

/// Resolves once `signal` fires.
///
/// If the handler cannot be installed the server keeps running: the future
/// stays pending instead of shutting down at startup.
pub async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(error = ?e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}
