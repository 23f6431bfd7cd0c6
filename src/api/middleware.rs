//! Shared application state, API errors and request middleware

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::content::{Connectivity, ConnectivityCell, ContentClient};
use crate::services::{DetailController, Formatter, HomeController, ListController, RichTextRenderer, SearchController};
use crate::theme::{StandardTemplateVars, ThemeEngine};

// ============================================================================
// Request Statistics
// ============================================================================

/// Lightweight request statistics using atomic operations (no locks)
pub struct RequestStats {
    /// Total number of requests processed
    total_requests: AtomicU64,
    /// Total response time in microseconds (for calculating average)
    total_response_time_us: AtomicU64,
    /// Application start time
    start_time: Instant,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a request with its response time
    pub fn record(&self, duration_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time_us.fetch_add(duration_us, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Average response time in microseconds
    pub fn avg_response_time_us(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        let total_time = self.total_response_time_us.load(Ordering::Relaxed);
        total_time as f64 / total as f64
    }

    /// Uptime in fractional seconds
    pub fn uptime_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: ContentClient,
    /// Connectivity shared by every request; handlers write back what their calls returned
    pub connectivity: Arc<ConnectivityCell>,
    pub theme_engine: Arc<ThemeEngine>,
    pub formatter: Formatter,
    pub renderer: RichTextRenderer,
    pub request_stats: Arc<RequestStats>,
}

impl AppState {
    pub fn new(config: Config, client: ContentClient, connectivity: Connectivity, theme_engine: ThemeEngine) -> Self {
        let formatter = Formatter::new(&config.strapi.url);
        Self {
            renderer: RichTextRenderer::with_formatter(formatter.clone()),
            formatter,
            config: Arc::new(config),
            client,
            connectivity: Arc::new(ConnectivityCell::new(connectivity)),
            theme_engine: Arc::new(theme_engine),
            request_stats: Arc::new(RequestStats::new()),
        }
    }

    pub fn lists(&self) -> ListController {
        ListController::new(self.client.clone(), self.config.site.list_limit)
    }

    pub fn details(&self) -> DetailController {
        DetailController::new(self.client.clone())
    }

    pub fn home(&self) -> HomeController {
        HomeController::new(self.client.clone())
    }

    pub fn search(&self) -> SearchController {
        SearchController::new(self.client.clone())
    }

    /// Standard template variables for a page at `request_path`
    pub fn standard_vars(&self, request_path: &str) -> StandardTemplateVars {
        StandardTemplateVars {
            site_title: self.config.site.title.clone(),
            request_path: request_path.to_string(),
            year: chrono::Utc::now().year(),
            connectivity: self.connectivity.get(),
        }
    }
}

// ============================================================================
// API Errors
// ============================================================================

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new("BAD_GATEWAY", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "BAD_GATEWAY" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Request stats middleware - records request count and response time
pub async fn request_stats_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_us = start.elapsed().as_micros() as u64;
    state.request_stats.record(duration_us);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_stats_average() {
        let stats = RequestStats::new();
        assert_eq!(stats.avg_response_time_us(), 0.0);

        stats.record(100);
        stats.record(300);
        assert_eq!(stats.total_requests(), 2);
        assert_eq!(stats.avg_response_time_us(), 200.0);
        assert!(stats.uptime_seconds() >= 0.0);
    }

    #[test]
    fn test_api_error_status() {
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation_error("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::bad_gateway("x").status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::internal_error("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
