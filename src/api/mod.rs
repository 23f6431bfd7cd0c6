//! API layer - HTTP handlers and routing
//!
//! This module contains:
//! - HTML pages (home, lists, details, search, about)
//! - JSON content API under `/api/v1`
//! - Search panels and the search event stream
//! - Connectivity status and reconnect
//! - Health check, request statistics and static assets

pub mod connectivity;
pub mod content;
pub mod health;
pub mod middleware;
pub mod pages;
pub mod search;
pub mod static_files;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use middleware::{ApiError, AppState, RequestStats};

/// Build the JSON API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .merge(content::router())
        .merge(search::router())
        .merge(connectivity::router())
        .route("/stats", get(health::stats))
}

fn cors_layer(cors_origin: &str) -> CorsLayer {
    let origin = if cors_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        match cors_origin.parse::<HeaderValue>() {
            Ok(origin) => AllowOrigin::exact(origin),
            Err(e) => {
                tracing::warn!("Invalid CORS origin {:?}: {}, allowing any origin", cors_origin, e);
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/v1", build_api_router())
        .route("/static/{*path}", get(static_files::serve_static))
        .merge(pages::router())
        // Unknown paths go home
        .fallback(|| async { Redirect::to("/") })
        .layer(cors_layer(cors_origin))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // Request stats middleware (outermost layer, runs for all requests)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_stats_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests;
