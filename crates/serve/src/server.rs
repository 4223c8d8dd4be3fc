//! Server module for the QuestSearch serve crate

use crate::handlers::{handle_health, handle_not_found, handle_root, AppState};
use crate::middleware::{request_id_middleware, security_headers_middleware, timing_middleware};
use crate::search::search_routes;
use crate::ServerConfig;
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::get,
    Router,
};
use questsearch_core::{QuestError, Result};
use std::{future::Future, net::SocketAddr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// QuestSearch HTTP server
pub struct QuestServer {
    config: ServerConfig,
    app: Router,
}

impl QuestServer {
    /// Create a new server instance
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let app = create_app(&config, state);
        Self { config, app }
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.bind_address();
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| QuestError::validation(format!("Invalid address {}: {}", addr, e)))?;

        let listener = TcpListener::bind(socket_addr).await?;
        Ok(listener)
    }

    /// Start the server and run until ctrl-c
    pub async fn start(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!("Starting QuestSearch server on {}", local_addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("QuestSearch server stopped");
        Ok(())
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The fully layered router
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the Axum application with middleware
pub fn create_app(config: &ServerConfig, state: AppState) -> Router {
    let api = search_routes().route("/health", get(handle_health));

    let mut app = Router::new()
        .route("/", get(handle_root))
        .nest("/api", api)
        .fallback(handle_not_found)
        .with_state(state);

    // Add middleware layers
    app = app.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(timing_middleware))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(RequestBodyLimitLayer::new(config.max_request_size)),
    );

    // Add CORS if enabled
    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([ACCEPT, CONTENT_TYPE]);

        app = app.layer(cors);
    }

    app
}

/// Server builder for configuration
pub struct ServerBuilder {
    config: ServerConfig,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Set the host address
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    /// Set maximum request size
    pub fn max_request_size(mut self, size: usize) -> Self {
        self.config.max_request_size = size;
        self
    }

    /// Build the server around the given state
    pub fn build(self, state: AppState) -> QuestServer {
        QuestServer::new(self.config, state)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questsearch_core::{Environment, MemoryStore, SearchPolicy};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            SearchPolicy::default(),
            Environment::Development,
        )
    }

    #[test]
    fn test_server_builder() {
        let server = ServerBuilder::new()
            .host("0.0.0.0")
            .port(8080)
            .cors(false)
            .max_request_size(5 * 1024 * 1024)
            .build(state());

        assert_eq!(server.config().host, "0.0.0.0");
        assert_eq!(server.config().port, 8080);
        assert!(!server.config().cors_enabled);
        assert_eq!(server.config().max_request_size, 5 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let server = ServerBuilder::new().port(0).build(state());
        let listener = server.bind().await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_bind_address() {
        let server = ServerBuilder::new().host("not an address").build(state());
        let err = server.bind().await.unwrap_err();
        assert!(matches!(err, QuestError::Validation { .. }));
    }
}
