//! # HTTP Server
//!
//! Main HTTP server combining the file API, the static `/uploads` mount and
//! the health probe.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::BearerAuth;
use crate::file_storage::{FileStore, LocalBackend, StorageResult};

use super::config::{cors_origin, HttpServerConfig};
use super::file_routes::{file_routes, FileState, UPLOADS_PREFIX};
use super::observability_routes::health_routes;

/// HTTP server for the file API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server, creating the upload directory if it is absent
    pub fn with_config(config: HttpServerConfig) -> StorageResult<Self> {
        let backend = LocalBackend::create(&config.upload_dir)?;
        let router = Self::build_router(&config, backend);
        Ok(Self { config, router })
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, backend: LocalBackend) -> Router {
        let uploads = ServeDir::new(backend.root());

        let file_state = Arc::new(FileState {
            store: FileStore::new(backend),
            auth: Arc::new(BearerAuth::new(config.api_key.clone())),
            public_url: config.public_url.clone(),
            fallback_host: config.socket_addr(),
            max_upload_bytes: config.max_upload_bytes,
        });

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|origin| {
                    let value = cors_origin(origin);
                    if value.is_none() {
                        warn!(%origin, "ignoring invalid CORS origin");
                    }
                    value
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/api", file_routes(file_state))
            // Static files bypass the bearer gate.
            .nest_service(UPLOADS_PREFIX, uploads)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C or SIGTERM
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;

        let upload_dir = self
            .config
            .upload_dir
            .canonicalize()
            .unwrap_or_else(|_| self.config.upload_dir.clone());
        info!("File API server running on port {}", self.config.port);
        info!("Uploaded files will be stored in {}", upload_dir.display());
        info!(%addr, "listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("server stopped");
        Ok(())
    }
}

/// Wait for Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp: &TempDir) -> HttpServerConfig {
        let mut config = HttpServerConfig::with_port(8080);
        config.api_key = "secret".to_string();
        config.upload_dir = temp.path().join("uploads");
        config
    }

    #[test]
    fn test_server_creation_makes_upload_dir() {
        let temp = TempDir::new().unwrap();
        let server = HttpServer::with_config(test_config(&temp)).unwrap();

        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
        assert!(temp.path().join("uploads").is_dir());
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let temp = TempDir::new().unwrap();
        let mut config = test_config(&temp);
        config.cors_origins = vec!["http://localhost:5173".to_string()];

        let _router = HttpServer::with_config(config).unwrap().router();
    }
}
