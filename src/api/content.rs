//! JSON content API
//!
//! Lists and single records pass straight through the content client, so
//! every response carries `origin` and `connectivity` next to `data`.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::content::{Connectivity, ContentQuery, LookupError, Origin, Pagination, SortKey};
use crate::models::{Article, Category, ContentEntity, Tag, Tutorial, Video};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list::<Article>))
        .route("/articles/{id}", get(detail::<Article>))
        .route("/tutorials", get(list::<Tutorial>))
        .route("/tutorials/{id}", get(detail::<Tutorial>))
        .route("/videos", get(list::<Video>))
        .route("/videos/{id}", get(detail::<Video>))
        .route("/categories", get(list::<Category>))
        .route("/categories/{id}", get(detail::<Category>))
        .route("/tags", get(list::<Tag>))
        .route("/tags/{id}", get(detail::<Tag>))
}

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Comma-separated sort keys (`publishDate:desc,title`)
    pub sort: Option<String>,
}

impl ListParams {
    /// Translate into a content query; unset parts keep the per-type defaults
    pub fn to_query(&self, default_page_size: u32) -> Result<ContentQuery, ApiError> {
        let mut query = ContentQuery::new();

        if self.page.is_some() || self.page_size.is_some() {
            let page = self.page.unwrap_or(1);
            let page_size = self.page_size.unwrap_or(default_page_size);
            if page == 0 || page_size == 0 {
                return Err(ApiError::validation_error("page and page_size must be at least 1"));
            }
            query = query.paginate(Pagination::page(page, page_size));
        }

        if let Some(sort) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            for key in sort.split(',') {
                let key: SortKey = key.parse().map_err(ApiError::validation_error)?;
                query = query.sort(key);
            }
        }

        Ok(query)
    }
}

/// Single record response
#[derive(Debug, Serialize)]
pub struct RecordResponse<T> {
    pub data: T,
    pub origin: Origin,
    pub connectivity: Connectivity,
}

async fn list<T: ContentEntity>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.to_query(state.config.site.list_limit)?;
    let fetched = state.client.list::<T>(state.connectivity.get(), query).await;
    state.connectivity.record(fetched.connectivity);
    Ok(Json(fetched))
}

async fn detail<T: ContentEntity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let fetched = state.client.get::<T>(state.connectivity.get(), &id).await;
    state.connectivity.record(fetched.connectivity);

    match fetched.data {
        Ok(data) => Ok(Json(RecordResponse {
            data,
            origin: fetched.origin,
            connectivity: fetched.connectivity,
        })),
        Err(err @ LookupError::NotFound { .. }) | Err(err @ LookupError::MissingIdentifier) => {
            Err(ApiError::not_found(err.to_string()))
        }
        Err(LookupError::Unavailable(err)) => Err(ApiError::bad_gateway(err.to_string())),
    }
}
