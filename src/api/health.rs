//! Health check and request statistics

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::content::Connectivity;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// ISO-8601 time of the check
    pub timestamp: String,
    /// Seconds since startup
    pub uptime: f64,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: state.request_stats.uptime_seconds(),
    })
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub version: &'static str,
    pub uptime_seconds: f64,
    pub total_requests: u64,
    pub avg_response_time_ms: f64,
    pub connectivity: Connectivity,
}

/// GET /api/v1/stats - request statistics collected by the middleware
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.request_stats.uptime_seconds(),
        total_requests: state.request_stats.total_requests(),
        avg_response_time_ms: state.request_stats.avg_response_time_us() / 1000.0,
        connectivity: state.connectivity.get(),
    })
}
