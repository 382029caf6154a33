//! HTTP server startup logic.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Parse the configured host and port into a socket address.
pub fn listen_addr(config: &HttpServerConfig) -> Result<SocketAddr, ServerError> {
    Ok(format!("{}:{}", config.host, config.port).parse()?)
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let handle = Handle::new();

    tracing::info!(%addr, "Starting HTTP server");

    shutdown::setup_shutdown_handler(
        handle.clone(),
        Duration::from_secs(config.shutdown_grace_seconds),
    );

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr() {
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            shutdown_grace_seconds: 1,
        };
        assert_eq!(listen_addr(&config).unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_listen_addr_rejects_hostname() {
        let config = HttpServerConfig {
            host: "not a host".to_string(),
            port: 8080,
            shutdown_grace_seconds: 1,
        };
        assert!(matches!(listen_addr(&config), Err(ServerError::Address(_))));
    }
}
