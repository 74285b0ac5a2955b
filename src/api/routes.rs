use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{any, get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;
use crate::ws;

/// Operational routes
fn ops_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
}

/// Real-time feed: websocket upgrade on either path
fn ws_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", any(ws::ws_handler))
        .route("/ws", any(ws::ws_handler))
}

/// Filing ingestion and fan-out
fn filing_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/simulate", post(handlers::simulate))
        .route("/broadcast", post(handlers::broadcast))
        .route(
            "/test-scheduled",
            get(handlers::test_scheduled).post(handlers::test_scheduled),
        )
        .route("/v1/summaries/{filing_id}", get(handlers::get_summary))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::new();
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(origin = %origin, error = %e, "ignoring invalid cors_origin");
            CorsLayer::new()
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.settings.http.max_body_bytes;
    let cors = cors_layer(state.settings.http.cors_origin.as_deref());

    Router::new()
        .merge(ops_routes())
        .merge(ws_routes())
        .merge(filing_routes())
        // route_layer so MatchedPath is available for the route label
        .route_layer(axum::middleware::from_fn(super::metrics::http_metrics))
        .with_state(state)
        .layer(axum::middleware::from_fn(super::request_id::request_id))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
}
