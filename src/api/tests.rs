use axum::http::{header, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use super::*;
use crate::config::Config;
use crate::content::testing::MockSource;
use crate::content::{Connectivity, ContentClient, FallbackProvider, FetchError};
use crate::theme::ThemeEngine;

fn state_with(source: Arc<MockSource>, connectivity: Connectivity) -> AppState {
    let client = ContentClient::new(source, FallbackProvider);
    let theme = ThemeEngine::new(Path::new("no-theme-overrides")).unwrap();
    AppState::new(Config::default(), client, connectivity, theme)
}

fn server(state: AppState) -> TestServer {
    TestServer::new(build_router(state, "*")).unwrap()
}

fn failing() -> Arc<MockSource> {
    Arc::new(MockSource::failing(FetchError::Status(503)))
}

fn location(response: &axum_test::TestResponse) -> String {
    response.header(header::LOCATION).to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let server = server(state_with(failing(), Connectivity::Live));

    let response = server.get("/api/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_article_list_falls_back_and_degrades() {
    let source = failing();
    let state = state_with(source.clone(), Connectivity::Live);
    let server = server(state.clone());

    let response = server.get("/api/v1/articles").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Advanced Player Engagement Strategies",
            "Building Immersive Game Worlds",
            "The Art of Game Balance"
        ]
    );
    assert_eq!(body["connectivity"], "degraded");
    assert!(body["origin"]["fallback"].is_object());

    // Degraded sticks and the API is no longer contacted
    let calls = source.call_count();
    let response = server.get("/articles").await;
    response.assert_status_ok();
    assert!(response.text().contains("Showing offline content"));
    assert_eq!(source.call_count(), calls);

    let body: Value = server.get("/api/v1/connectivity").await.json();
    assert_eq!(body["connectivity"], "degraded");
}

#[tokio::test]
async fn test_empty_live_list_keeps_connectivity() {
    let source = Arc::new(MockSource::answering(json!({ "data": [] })));
    let server = server(state_with(source, Connectivity::Live));

    let body: Value = server.get("/api/v1/tutorials").await.json();
    assert_eq!(body["connectivity"], "live");
    assert_eq!(body["origin"], json!({ "fallback": "empty" }));
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_detail_redirects_to_list() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let response = server.get("/videos/video-404").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/videos");

    let response = server.get("/articles/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/articles");
}

#[tokio::test]
async fn test_detail_renders_from_fallback() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let response = server.get("/tutorials/tutorial-1").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Unity 2D Game Development Masterclass"));
    assert!(html.contains("3 chapters"));
    assert!(html.contains("DP"));

    let response = server.get("/videos/video-1").await;
    response.assert_status_ok();
    assert!(response.text().contains("data-start=\"200\""));
}

#[tokio::test]
async fn test_live_detail_failure_is_bad_gateway() {
    let pages = server(state_with(failing(), Connectivity::Live));

    let response = pages.get("/articles/article-1").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(response.text().contains("Content unavailable"));

    // The failure degraded connectivity, so later lookups are served from fallback
    let response = pages.get("/articles/article-1").await;
    response.assert_status_ok();

    let json_server = server(state_with(failing(), Connectivity::Live));
    let response = json_server.get("/api/v1/articles/article-1").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_GATEWAY");
}

#[tokio::test]
async fn test_json_detail_not_found() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let response = server.get("/api/v1/tags/tag-99").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let body: Value = server.get("/api/v1/tags/tag-1").await.json();
    assert_eq!(body["data"]["name"], "Unity");
    assert_eq!(body["origin"], json!({ "fallback": "degraded" }));
}

#[tokio::test]
async fn test_unknown_path_redirects_home() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let response = server.get("/forums/general").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_reconnect_restores_live() {
    let source = Arc::new(MockSource::answering(json!({ "data": [] })));
    let server = server(state_with(source, Connectivity::Degraded));

    let body: Value = server.post("/api/v1/connectivity/reconnect").await.json();
    assert_eq!(body["connectivity"], "live");
    assert_eq!(body["offline"], false);

    let body: Value = server.get("/api/v1/connectivity").await.json();
    assert_eq!(body["connectivity"], "live");
}

#[tokio::test]
async fn test_reconnect_failure_stays_degraded() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let body: Value = server.post("/api/v1/connectivity/reconnect").await.json();
    assert_eq!(body["connectivity"], "degraded");
}

#[tokio::test]
async fn test_list_filters() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let html = server.get("/tutorials?difficulty=Advanced").await.text();
    assert!(html.contains("Advanced Shader Programming in Unity"));
    assert!(!html.contains("Complete C# Programming for Games"));

    let html = server.get("/articles?category=Art").await.text();
    assert!(html.contains("Building Immersive Game Worlds"));
    assert!(!html.contains("The Art of Game Balance"));

    let html = server.get("/articles?category=All").await.text();
    assert!(html.contains("The Art of Game Balance"));
}

#[tokio::test]
async fn test_home_and_about() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let html = server.get("/").await.text();
    assert!(html.contains("Advanced Player Engagement Strategies"));
    assert!(html.contains("Featured Tutorials"));

    let html = server.get("/about").await.text();
    assert!(html.contains("Mike Rodriguez"));
    assert!(html.contains("25K+"));
}

#[tokio::test]
async fn test_search_page() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let html = server.get("/search").await.text();
    assert!(html.contains("Unreal Engine"));

    let html = server.get("/search?q=shader").await.text();
    assert!(html.contains("Advanced Shader Programming in Unity"));
    assert!(html.contains("Advanced Shader Effects in Unreal Engine 5"));
}

#[tokio::test]
async fn test_search_panel_json() {
    let source = Arc::new(MockSource::answering(json!({
        "data": [{ "id": 1, "documentId": "v1", "title": "Unity Lighting" }]
    })));
    let server = server(state_with(source.clone(), Connectivity::Live));

    let body: Value = server.get("/api/v1/search?q=unity&type=videos").await.json();
    assert_eq!(body["results"]["type"], "videos");
    assert_eq!(body["results"]["items"][0]["title"], "Unity Lighting");

    let (path, params) = source.calls().pop().unwrap();
    assert_eq!(path, "videos");
    assert!(params.contains(&("filters[title][$containsi]".to_string(), "unity".to_string())));

    let response = server.get("/api/v1/search?q=unity&type=tags").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_stream() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let body = server.get("/api/v1/search/stream?q=unity").await.text();
    assert_eq!(body.matches("event: panel").count(), 3);
    assert!(body.trim_end().contains("event: done"));
    assert!(body.rfind("event: done") > body.rfind("event: panel"));

    let body = server.get("/api/v1/search/stream?q=un&mode=input").await.text();
    assert_eq!(body.matches("event: panel").count(), 0);
    assert!(body.contains("event: done"));

    let body = server.get("/api/v1/search/stream?q=").await.text();
    assert!(body.contains("event: clear"));
}

#[tokio::test]
async fn test_static_assets() {
    let server = server(state_with(failing(), Connectivity::Degraded));

    let response = server.get("/static/site.css").await;
    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "text/css");

    let response = server.get("/static/missing.css").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_stats_are_recorded() {
    let state = state_with(failing(), Connectivity::Degraded);
    let server = server(state.clone());

    server.get("/api/health").await;
    server.get("/about").await;
    assert_eq!(state.request_stats.total_requests(), 2);

    let body: Value = server.get("/api/v1/stats").await.json();
    // The stats request itself is recorded once it completes
    assert_eq!(body["total_requests"], 2);
    assert!(body["avg_response_time_ms"].as_f64().unwrap() >= 0.0);
    assert_eq!(body["connectivity"], "degraded");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
