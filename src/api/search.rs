//! Search API: single panels and a server-sent event stream
//!
//! The stream emits one `panel` event per content type in completion
//! order, then `done`. A cleared query emits `clear` before `done`; a
//! too-short query typed in input mode emits only `done`.

use axum::{
    extract::{Query, State},
    response::{
        sse::{Event, KeepAlive, KeepAliveStream, Sse},
        IntoResponse,
    },
    routing::get,
    Json, Router,
};
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::middleware::{ApiError, AppState};
use crate::models::ContentType;
use crate::services::{decide, SearchAction, SearchMode};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_panel))
        .route("/search/stream", get(search_stream))
}

type EventStream = BoxStream<'static, Result<Event, axum::Error>>;

/// Generations handed out to streamed searches
static GENERATION: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Deserialize)]
pub struct PanelParams {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type", default = "default_type")]
    pub content_type: String,
}

fn default_type() -> String {
    ContentType::Article.endpoint().to_string()
}

#[derive(Debug, Deserialize)]
pub struct StreamParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub mode: SearchMode,
}

#[derive(Debug, Serialize)]
struct Done {
    generation: u64,
    query: String,
}

/// GET /api/v1/search?q=&type= - one panel
async fn search_panel(
    State(state): State<AppState>,
    Query(params): Query<PanelParams>,
) -> Result<impl IntoResponse, ApiError> {
    let content_type: ContentType = params
        .content_type
        .parse()
        .map_err(|e: crate::models::UnknownContentType| ApiError::validation_error(e.to_string()))?;
    if !ContentType::BROWSABLE.contains(&content_type) {
        return Err(ApiError::validation_error(format!("{} cannot be searched", content_type)));
    }

    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::validation_error("Query must not be empty"));
    }

    let generation = GENERATION.fetch_add(1, Ordering::Relaxed) + 1;
    let panel = state
        .search()
        .panel(state.connectivity.get(), content_type, query, generation)
        .await;
    state.connectivity.record(panel.connectivity);
    Ok(Json(panel))
}

/// GET /api/v1/search/stream?q=&mode= - panels as server-sent events
async fn search_stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Sse<KeepAliveStream<EventStream>> {
    let generation = GENERATION.fetch_add(1, Ordering::Relaxed) + 1;
    let action = decide(params.mode, &params.q, state.config.site.search_min_chars);
    tracing::debug!(generation, ?action, "Search stream");

    let done = Done {
        generation,
        query: params.q.trim().to_string(),
    };
    let done = stream::once(async move { Event::default().event("done").json_data(&done) });

    let events: EventStream = match action {
        SearchAction::Run(query) => {
            let rx = state.search().spawn(state.connectivity.get(), &query, generation);
            let cell = state.connectivity.clone();
            let panels = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|panel| (panel, rx)) })
                .map(move |panel| {
                    cell.record(panel.connectivity);
                    Event::default().event("panel").json_data(&panel)
                });
            panels.chain(done).boxed()
        }
        SearchAction::Clear => stream::once(async { Ok(Event::default().event("clear").data("")) })
            .chain(done)
            .boxed(),
        SearchAction::Keep => done.boxed(),
    };

    Sse::new(events).keep_alive(KeepAlive::default())
}
