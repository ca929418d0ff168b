//! Route definitions for the Draftroom HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`, with the
//! WebSocket handshake alongside. The router receives `AppState` and passes
//! it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(document_routes())
        .merge(version_routes())
        .merge(diff_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws/documents/{id}", get(handlers::ws::ws_upgrade));

    let cors = build_cors_layer(&state);

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ));

    if state.throttle.enabled() {
        router = router.layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::throttle::throttle_requests,
        ));
    }

    router.with_state(state)
}

/// Document CRUD
fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(handlers::document::create_document))
        .route("/documents", get(handlers::document::list_documents))
        .route("/documents/{id}", get(handlers::document::get_document))
        .route("/documents/{id}", put(handlers::document::update_document))
        .route(
            "/documents/{id}",
            delete(handlers::document::delete_document),
        )
}

/// Version history, restore, and tags
fn version_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents/{id}/versions",
            post(handlers::version::create_version),
        )
        .route(
            "/documents/{id}/versions",
            get(handlers::version::list_versions),
        )
        .route(
            "/documents/{id}/versions/number/{n}",
            get(handlers::version::get_version_by_number),
        )
        .route(
            "/documents/{id}/versions/{version_id}",
            get(handlers::version::get_version),
        )
        .route(
            "/documents/{id}/restore/{version_id}",
            post(handlers::version::restore_version),
        )
        .route(
            "/documents/{id}/versions/{version_id}/tags",
            post(handlers::version::create_tag),
        )
        .route(
            "/documents/{id}/versions/{version_id}/tags",
            get(handlers::version::list_tags),
        )
        .route("/tags/{tag_id}", delete(handlers::version::delete_tag))
}

/// Version comparison
fn diff_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/diff/documents/{id}/numbers/{old_n}/{new_n}",
            get(handlers::diff::compare_versions_by_number),
        )
        .route(
            "/diff/documents/{id}/latest/{version_id}",
            get(handlers::diff::compare_with_latest),
        )
        .route(
            "/diff/{old_id}/{new_id}",
            get(handlers::diff::compare_versions),
        )
}

/// Health check endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new().allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|method| method.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    cors.max_age(std::time::Duration::from_secs(
        cors_config.max_age_seconds,
    ))
}
