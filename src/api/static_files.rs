//! Static asset serving

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::middleware::AppState;

/// GET /static/{*path} - override directory first, then embedded defaults
pub async fn serve_static(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match state.theme_engine.asset(&path) {
        Some(asset) => (
            [
                (header::CONTENT_TYPE, asset.content_type),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            Body::from(asset.data.into_owned()),
        )
            .into_response(),
        None => not_found(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
