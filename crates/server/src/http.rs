//! Axum-backed HTTP server

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use observability::ServerMetrics;
use parking_lot::RwLock;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::traits::Server;

/// Serves an application router on the configured address.
///
/// Every request is traced and counted in `server_requests_total` and friends.
///
/// ```ignore
/// let server = HttpServer::new(ServerConfig::new("0.0.0.0", 8000), market_data_routes(state));
/// server.run_with_signals().await?;
/// ```
#[derive(Clone)]
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    running: Arc<AtomicBool>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, router: Router) -> Self {
        let metrics = ServerMetrics::new("http");
        let router = router
            .layer(middleware::from_fn_with_state(metrics, record_request))
            .layer(TraceLayer::new_for_http());

        Self {
            config,
            router,
            running: Arc::new(AtomicBool::new(false)),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

async fn record_request(State(metrics): State<ServerMetrics>, request: Request, next: Next) -> Response {
    let started = Instant::now();
    let response = next.run(request).await;
    metrics.record_request(started.elapsed(), response.status().as_u16());
    response
}

#[async_trait]
impl Server for HttpServer {
    fn name(&self) -> &str {
        "http"
    }

    fn address(&self) -> Option<SocketAddr> {
        *self.bound_addr.read()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self, shutdown_token: CancellationToken) -> Result<()> {
        let addr = self.config.http_addr()?;

        info!(%addr, "Starting HTTP server");

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;
        let local_addr = listener.local_addr()?;

        *self.bound_addr.write() = Some(local_addr);
        self.running.store(true, Ordering::SeqCst);
        info!(%local_addr, "HTTP server listening");

        let drain_token = shutdown_token.clone();
        let serve = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                drain_token.cancelled().await;
                info!("HTTP server received shutdown signal");
            })
            .into_future();

        // Connections still open after the grace period are dropped.
        let grace = self.config.shutdown_grace;
        let result = tokio::select! {
            result = serve => result,
            _ = async {
                shutdown_token.cancelled().await;
                tokio::time::sleep(grace).await;
            } => {
                warn!(?grace, "Grace period elapsed, closing remaining connections");
                Ok(())
            }
        };

        self.running.store(false, Ordering::SeqCst);
        *self.bound_addr.write() = None;

        match result {
            Ok(()) => {
                info!("HTTP server shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(%e, "HTTP server error");
                Err(ServerError::Io(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn ping_router() -> Router {
        Router::new().route("/ping", get(|| async { "pong" }))
    }

    async fn wait_for_address(server: &HttpServer) -> SocketAddr {
        for _ in 0..100 {
            if let Some(addr) = server.address() {
                return addr;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("server never bound");
    }

    #[tokio::test]
    async fn test_serves_requests_then_shuts_down() {
        let server = HttpServer::new(ServerConfig::new("127.0.0.1", 0), ping_router());
        let observer = server.clone();
        assert!(!observer.is_running());

        let token = CancellationToken::new();
        let server_token = token.clone();
        let handle = tokio::spawn(async move { server.run(server_token).await });
        let addr = wait_for_address(&observer).await;
        assert!(observer.is_running());

        let body = reqwest::get(format!("http://{}/ping", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");

        token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert_ok!(result.unwrap().unwrap());
        assert!(!observer.is_running());
        assert!(observer.address().is_none());
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let server = HttpServer::new(ServerConfig::new("127.0.0.1", port), ping_router());
        let result = server.run(CancellationToken::new()).await;

        assert!(matches!(assert_err!(result), ServerError::BindError { .. }));
    }

    #[test]
    fn test_http_server_name() {
        let server = HttpServer::new(ServerConfig::default(), ping_router());
        assert_eq!(server.name(), "http");
        assert_eq!(server.config().http_port, 8000);
    }
}
