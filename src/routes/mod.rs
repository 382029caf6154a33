//! HTTP route handlers.
//!
//! Probe endpoints accept every method and reject non-GET themselves so the
//! 405 body is the JSON rejection rather than axum's empty default. Probe
//! responses are never cacheable; the landing page and static assets carry
//! per-route Cache-Control headers.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;
pub mod ready;

use axum::{
    http::header::{HeaderValue, CACHE_CONTROL},
    middleware,
    routing::{any, get},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HOME, CACHE_CONTROL_NO_STORE, CACHE_CONTROL_STATIC};
use crate::http::static_files::create_static_service;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Probes - always fresh
    let probe_routes = Router::new()
        .route("/api/health", any(health::health))
        .route("/api/ready", any(ready::ready))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    // Landing page - moderate cache
    let home_routes = Router::new().route("/", get(home::index)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HOME),
        ),
    );

    // Static files - long cache with immutable hint
    let static_routes = Router::new()
        .nest_service("/static", create_static_service(&state.config.ui))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATIC),
        ));

    Router::new()
        .merge(probe_routes)
        .merge(home_routes)
        .merge(static_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
