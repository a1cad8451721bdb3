//! # Server
//!
//! HTTP server lifecycle for Constellation: binding, request metrics,
//! graceful shutdown on Ctrl+C or SIGTERM, and pre-flight port checks.
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt};
//!
//! let config = ServerConfig::new("0.0.0.0", 8000);
//! server::validate_http_port(&config).await?;
//! HttpServer::new(config, router).run_with_signals().await?;
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use config::{ServerConfig, DEFAULT_HTTP_PORT};
pub use error::{Result, ServerError};
pub use http::HttpServer;
pub use port_validator::{validate_http_port, validate_port_range};
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
