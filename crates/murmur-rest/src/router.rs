//! Main application router.

use crate::{
    controllers::{auth_controller, health_controller, notification_controller, post_controller, user_controller},
    middleware::{auth_middleware, logging_middleware, AuthMiddlewareState},
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, Router};
use murmur_config::ServerConfig;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the main application router.
///
/// Registration and login are public; every other `/api/v1` route goes
/// through the session middleware, which rejects revoked or unverifiable
/// tokens before the handler runs.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);
    let auth_state = AuthMiddlewareState::new(state.auth_service.clone());

    let protected = Router::new()
        .nest("/auth", auth_controller::router())
        .nest("/users", user_controller::router())
        .nest("/posts", post_controller::router())
        .nest("/notifications", notification_controller::router())
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let api_router = Router::new()
        .nest("/auth", auth_controller::public_router())
        .merge(protected);

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/api/v1", api_router)
        .route("/", get(root))
        .with_state(state)
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints under /api/v1");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Murmur API v1"
}
