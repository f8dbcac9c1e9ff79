//! Route definitions

use super::handlers;
use super::state::AppState;
use crate::config::ServerSettings;
use anyhow::Context;
use tokio::net::TcpListener;
use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server.cors_origins);

    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/search", get(handlers::search))
        // API routes
        .route("/api/health", get(handlers::health))
        .route("/api/search", get(handlers::api_search))
        .route("/api/images", get(handlers::api_images))
        .layer(cors)
        .with_state(state)
}

/// Listed origins, or any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Bind the configured address. Host names such as `localhost` are resolved.
pub async fn bind_listener(server: &ServerSettings) -> anyhow::Result<TcpListener> {
    TcpListener::bind((server.bind_address.as_str(), server.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", server.bind_address, server.port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_accepts_host_names() {
        let server = ServerSettings {
            bind_address: "localhost".to_string(),
            port: 0,
            ..Default::default()
        };
        let listener = bind_listener(&server).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_rejects_unresolvable_host() {
        let server = ServerSettings {
            bind_address: "not a host name".to_string(),
            port: 0,
            ..Default::default()
        };
        assert!(bind_listener(&server).await.is_err());
    }
}
