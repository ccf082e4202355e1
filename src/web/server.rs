//! Web server for parley.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::{ParleyError, Result};
use crate::config::ServerConfig;

use super::handlers::SharedEngine;
use super::router::{create_health_router, create_router};

/// HTTP + WebSocket server over a shared chat engine.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Shared engine state.
    engine: SharedEngine,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, engine: SharedEngine) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|_| ParleyError::Addr(format!("{}:{}", config.host, config.port)))?;
        Ok(Self {
            addr,
            engine,
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> Router {
        create_router(self.engine.clone(), &self.cors_origins).merge(create_health_router())
    }

    /// Run the web server until it fails or the process exits.
    pub async fn run(self) -> Result<()> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("server listening on http://{}", local_addr);
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("server listening on http://{}", local_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
