//! HTTP API: `POST /api/analyze` and `GET /health`.

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::pipeline::Analyzer;

pub use error::ApiError;

/// CORS policy from the configured origin list.
///
/// Credentials are only allowed for an explicit origin list; browsers reject
/// them together with a wildcard origin.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(analyzer: Analyzer) -> Router {
    let cors = cors_layer(&analyzer.config().server);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/analyze", post(handlers::analyze))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(analyzer)
}

pub async fn serve(analyzer: Analyzer, addr: SocketAddr) -> Result<()> {
    let app = router(analyzer);

    tracing::info!("Starting hazard screening API on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
