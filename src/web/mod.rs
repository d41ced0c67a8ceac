//! Web server module.

mod handlers;

pub use handlers::*;

use crate::config::WardenConfig;
use crate::db::Store;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: WardenConfig,
    pub store: Store,
}

/// JSON API server for Freshness Warden.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: WardenConfig, store: Store) -> Self {
        Self {
            state: AppState { config, store },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            // Sources and checks
            .route(
                "/api/sources",
                get(handlers::handle_get_sources).post(handlers::handle_create_source),
            )
            .route("/api/sources/{name}", delete(handlers::handle_delete_source))
            .route(
                "/api/sources/{name}/checks",
                get(handlers::handle_get_checks).post(handlers::handle_log_check),
            )
            // Reports
            .route("/api/health/sources", get(handlers::handle_source_health))
            .route("/api/health/owners", get(handlers::handle_owner_health))
            .route("/api/stale", get(handlers::handle_stale))
            .route("/api/summary", get(handlers::handle_summary))
            .route("/api/rollup", get(handlers::handle_rollup))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> std::io::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await
    }
}
