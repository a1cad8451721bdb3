//! Pre-flight port checks
//!
//! Checking before binding is racy: another process can take the port in
//! between. The check exists for an early, readable error at start-up; the
//! real bind in [`HttpServer::run`](crate::http::HttpServer) is authoritative.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Range-check and probe the configured HTTP port.
///
/// Port 0 passes without a probe; the OS assigns one at bind time.
pub async fn validate_http_port(config: &ServerConfig) -> Result<()> {
    validate_port_range(config.http_port)?;
    if config.http_port == 0 {
        debug!("Ephemeral HTTP port requested, skipping availability probe");
        return Ok(());
    }

    let addr = config.http_addr()?;
    match TcpListener::bind(addr).await {
        Ok(listener) => {
            drop(listener);
            info!("HTTP port {} is available", config.http_port);
            Ok(())
        }
        Err(e) => {
            error!("HTTP port {} is NOT available: {}", config.http_port, e);
            Err(ServerError::port_in_use(config.http_port, e.to_string()))
        }
    }
}

/// Ports below 1024 are allowed with a warning.
pub fn validate_port_range(port: u16) -> Result<()> {
    if port != 0 && port < 1024 {
        warn!(
            "Port {} is a privileged port (requires root/admin privileges)",
            port
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_port_range() {
        assert!(validate_port_range(0).is_ok());
        assert!(validate_port_range(80).is_ok());
        assert!(validate_port_range(8000).is_ok());
    }

    #[tokio::test]
    async fn test_occupied_port_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = ServerConfig::new("127.0.0.1", port);

        assert!(matches!(
            validate_http_port(&config).await,
            Err(ServerError::PortInUse { port: p, .. }) if p == port
        ));

        drop(listener);
        assert!(validate_http_port(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_ephemeral_port_skips_probe() {
        assert!(validate_http_port(&ServerConfig::new("127.0.0.1", 0)).await.is_ok());
    }
}
