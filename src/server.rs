// ABOUTME: HTTP server bootstrap: binds the listener and serves the router
// ABOUTME: Stops accepting connections on Ctrl-C or SIGTERM and drains in-flight requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use crate::routes::build_router;

/// Foodgram HTTP server
pub struct FoodgramServer {
    resources: Arc<ServerResources>,
}

impl FoodgramServer {
    /// Create a server over prepared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Router with every route and middleware layer
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.resources))
    }

    /// Bind the configured address and serve until a shutdown signal
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid, the port cannot be bound,
    /// or the server fails while running
    pub async fn run(self) -> AppResult<()> {
        let config = &self.resources.config;
        let addr: SocketAddr = format!("{}:{}", config.http_host, config.http_port)
            .parse()
            .map_err(|e| AppError::config(format!("Invalid listen address: {e}")))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        info!(%addr, "HTTP server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("HTTP server error: {e}")))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
