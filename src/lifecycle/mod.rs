//! Signal handling for graceful shutdown

use tokio::signal;
use tokio::signal::unix::{signal as unix_signal, SignalKind};
use tracing::debug;

/// Wait for SIGTERM or SIGINT
pub async fn shutdown_signal() {
    let mut sigterm =
        unix_signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

    tokio::select! {
        _ = signal::ctrl_c() => {
            debug!("received SIGINT");
        }
        _ = sigterm.recv() => {
            debug!("received SIGTERM");
        }
    }
}
