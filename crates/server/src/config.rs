//! Server configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;
use std::time::Duration;

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// How long in-flight requests get to drain after shutdown is signalled
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Listen address and shutdown behaviour for the HTTP server.
///
/// # Example
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 8000);
/// assert_eq!(config.http_addr().unwrap().port(), 8000);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port 0 asks the OS for an ephemeral port
    pub http_port: u16,
    pub shutdown_grace: Duration,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, http_port: u16) -> Self {
        Self {
            host: host.into(),
            http_port,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.http_port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.http_port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_HTTP_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.shutdown_grace, Duration::from_secs(30));
    }

    #[test]
    fn test_http_addr() {
        let addr = ServerConfig::new("127.0.0.1", 8123).http_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8123");

        assert!(matches!(
            ServerConfig::new("not a host", 8123).http_addr(),
            Err(ServerError::InvalidAddress(_))
        ));
    }
}
