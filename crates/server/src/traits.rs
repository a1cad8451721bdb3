//! Server lifecycle traits

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::shutdown::ShutdownController;

/// A long-running network listener.
///
/// `run` binds, serves until `shutdown` is cancelled, then drains in-flight
/// requests before returning. `address` is `Some` only while bound, which is
/// how callers learn the real port after binding to port 0.
#[async_trait]
pub trait Server: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn address(&self) -> Option<SocketAddr>;

    fn is_running(&self) -> bool;

    async fn run(&self, shutdown: CancellationToken) -> Result<()>;
}

/// Convenience runners, implemented for every [`Server`].
pub trait ServerExt: Server + Sized {
    /// Run in the foreground until Ctrl+C or SIGTERM.
    fn run_with_signals(self) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            let shutdown = ShutdownController::with_signals();
            self.run(shutdown.token()).await
        }
    }
}

impl<T: Server + Sized> ServerExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct IdleServer;

    #[async_trait]
    impl Server for IdleServer {
        fn name(&self) -> &str {
            "idle"
        }

        fn address(&self) -> Option<SocketAddr> {
            None
        }

        fn is_running(&self) -> bool {
            false
        }

        async fn run(&self, shutdown: CancellationToken) -> Result<()> {
            shutdown.cancelled().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_returns_once_token_cancelled() {
        let controller = ShutdownController::new();
        let token = controller.token();
        let handle = tokio::spawn(async move { IdleServer.run(token).await });

        controller.shutdown();

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
    }

    #[tokio::test]
    async fn test_run_with_signals_keeps_serving() {
        let result = tokio::time::timeout(Duration::from_millis(50), IdleServer.run_with_signals()).await;
        assert!(result.is_err(), "server stopped without a signal");
    }
}
