//! Graceful shutdown coordination
//!
//! One [`ShutdownController`] per process. The HTTP server holds its token
//! and drains once the controller is cancelled by a signal or an explicit
//! [`ShutdownController::shutdown`].

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller cancelled on Ctrl+C, or SIGTERM on unix.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_signals() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            wait_for_signal().await;
            token.cancel();
        });

        controller
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn shutdown(&self) {
        info!("Manual shutdown triggered");
        self.token.cancel();
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to listen for SIGTERM: {}", e);
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = ctrl_c() => {}
        _ = terminate.recv() => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
        Err(e) => {
            // Never resolve; otherwise a broken signal handler would stop the server at once.
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_manual_shutdown_cancels_every_token() {
        let controller = ShutdownController::new();
        let server = controller.token();
        let other = controller.clone().token();

        assert!(!server.is_cancelled());

        controller.shutdown();

        assert!(server.is_cancelled());
        assert!(other.is_cancelled());
    }

    #[tokio::test]
    async fn test_signal_controller_can_be_shut_down_manually() {
        let controller = ShutdownController::with_signals();
        let token = controller.token();

        controller.shutdown();

        assert!(tokio::time::timeout(Duration::from_secs(1), token.cancelled()).await.is_ok());
    }
}
