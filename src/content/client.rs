//! Content client with fallback
//!
//! Every call takes the caller's current `Connectivity` and hands back the
//! resulting one next to the data. While degraded, the remote API is not
//! contacted at all; only `reconnect` can bring the client back to live.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::fallback::FallbackProvider;
use super::query::{ContentQuery, FilterOperator};
use super::source::{ContentSource, FetchError};
use crate::models::content::normalize_entity;
use crate::models::{Article, Category, ContentEntity, ContentType, Tag, Tutorial, Video};

/// Whether the content API is currently being used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    #[default]
    Live,
    Degraded,
}

impl Connectivity {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded)
    }
}

/// Shared connectivity slot held in application state
///
/// `record` only ever moves towards `Degraded`; `set` is reserved for
/// reconnect and startup.
#[derive(Debug, Default)]
pub struct ConnectivityCell {
    degraded: AtomicBool,
}

impl ConnectivityCell {
    pub fn new(initial: Connectivity) -> Self {
        Self {
            degraded: AtomicBool::new(initial.is_degraded()),
        }
    }

    pub fn get(&self) -> Connectivity {
        if self.degraded.load(Ordering::Acquire) {
            Connectivity::Degraded
        } else {
            Connectivity::Live
        }
    }

    /// Write back the connectivity a content call returned
    pub fn record(&self, connectivity: Connectivity) {
        if connectivity.is_degraded() {
            self.degraded.store(true, Ordering::Release);
        }
    }

    pub fn set(&self, connectivity: Connectivity) {
        self.degraded.store(connectivity.is_degraded(), Ordering::Release);
    }
}

/// Why fallback content was served
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Client was already degraded; no request was made
    Degraded,
    /// The request failed
    Failed(FetchError),
    /// The request succeeded with zero records
    Empty,
}

/// Where the data in a `Fetched` came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Live,
    Fallback(FallbackReason),
}

impl Origin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Pagination metadata reported by the content API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
}

/// Result of a content call
#[derive(Debug, Clone, Serialize)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: Origin,
    pub connectivity: Connectivity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> Fetched<T> {
    fn live(data: T, pagination: Option<PaginationMeta>) -> Self {
        Self {
            data,
            origin: Origin::Live,
            connectivity: Connectivity::Live,
            pagination,
        }
    }

    fn fallback(data: T, reason: FallbackReason, connectivity: Connectivity) -> Self {
        Self {
            data,
            origin: Origin::Fallback(reason),
            connectivity,
            pagination: None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            origin: self.origin,
            connectivity: self.connectivity,
            pagination: self.pagination,
        }
    }
}

/// Single-record lookup failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Missing identifier")]
    MissingIdentifier,
    #[error("{content_type} '{identifier}' not found")]
    NotFound {
        content_type: ContentType,
        identifier: String,
    },
    #[error("Content unavailable: {0}")]
    Unavailable(FetchError),
}

/// Content API client with fallback substitution
#[derive(Clone)]
pub struct ContentClient {
    source: Arc<dyn ContentSource>,
    fallback: FallbackProvider,
    empty_as_failure: bool,
}

impl ContentClient {
    pub fn new(source: Arc<dyn ContentSource>, fallback: FallbackProvider) -> Self {
        Self {
            source,
            fallback,
            empty_as_failure: true,
        }
    }

    /// Whether an empty live list is replaced with fallback content
    pub fn with_empty_as_failure(mut self, empty_as_failure: bool) -> Self {
        self.empty_as_failure = empty_as_failure;
        self
    }

    pub fn fallback(&self) -> &FallbackProvider {
        &self.fallback
    }

    /// List records of `T`; `query` is merged over the type's defaults
    pub async fn list<T: ContentEntity>(&self, connectivity: Connectivity, query: ContentQuery) -> Fetched<Vec<T>> {
        let content_type = T::CONTENT_TYPE;

        if connectivity.is_degraded() {
            tracing::debug!(%content_type, "Degraded, serving fallback list");
            let records = narrow_fallback(self.fallback.list::<T>(), &query);
            return Fetched::fallback(records, FallbackReason::Degraded, Connectivity::Degraded);
        }

        let query = ContentQuery::defaults_for(content_type).overlay(query);
        let result = self
            .source
            .fetch(content_type.endpoint(), &query.to_params())
            .await
            .and_then(decode_list::<T>);

        match result {
            Ok((records, _)) if records.is_empty() && self.empty_as_failure => {
                tracing::warn!(%content_type, "Content API returned no records, serving fallback");
                let records = narrow_fallback(self.fallback.list::<T>(), &query);
                Fetched::fallback(records, FallbackReason::Empty, Connectivity::Live)
            }
            Ok((records, pagination)) => Fetched::live(records, pagination),
            Err(err) => {
                tracing::warn!(%content_type, error = %err, "Content API request failed, switching to fallback content");
                let records = narrow_fallback(self.fallback.list::<T>(), &query);
                Fetched::fallback(records, FallbackReason::Failed(err), Connectivity::Degraded)
            }
        }
    }

    /// Fetch one record of `T` by document id (or, when degraded, any fallback identifier)
    pub async fn get<T: ContentEntity>(&self, connectivity: Connectivity, identifier: &str) -> Fetched<Result<T, LookupError>> {
        let content_type = T::CONTENT_TYPE;
        let identifier = identifier.trim();

        if identifier.is_empty() {
            return Fetched {
                data: Err(LookupError::MissingIdentifier),
                origin: Origin::Live,
                connectivity,
                pagination: None,
            };
        }

        let not_found = || LookupError::NotFound {
            content_type,
            identifier: identifier.to_string(),
        };

        if connectivity.is_degraded() {
            let record = self.fallback.find::<T>(identifier).ok_or_else(not_found);
            return Fetched::fallback(record, FallbackReason::Degraded, Connectivity::Degraded);
        }

        let path = format!("{}/{}", content_type.endpoint(), urlencoding::encode(identifier));
        let params = ContentQuery::lookup_defaults(content_type).to_params();
        let result = self.source.fetch(&path, &params).await.and_then(decode_one::<T>);

        match result {
            Ok(Some(record)) => Fetched::live(Ok(record), None),
            Ok(None) | Err(FetchError::NotFound) => {
                tracing::debug!(%content_type, identifier, "Record not found");
                Fetched::live(Err(not_found()), None)
            }
            Err(err) => {
                tracing::warn!(%content_type, identifier, error = %err, "Content API lookup failed, switching to fallback content");
                Fetched::fallback(
                    Err(LookupError::Unavailable(err.clone())),
                    FallbackReason::Failed(err),
                    Connectivity::Degraded,
                )
            }
        }
    }

    /// Featured records of `T`, at most `limit`
    pub async fn featured<T: ContentEntity>(&self, connectivity: Connectivity, limit: u32) -> Fetched<Vec<T>> {
        self.list(connectivity, ContentQuery::featured(limit)).await
    }

    /// Records of `T` whose title contains `query`, case-insensitively
    pub async fn search<T: ContentEntity>(&self, connectivity: Connectivity, query: &str) -> Fetched<Vec<T>> {
        self.list(connectivity, ContentQuery::title_search(query)).await
    }

    /// Probe the content API; returns `Live` when it answers
    pub async fn reconnect(&self) -> Connectivity {
        let params = vec![("pagination[limit]".to_string(), "1".to_string())];
        match self.source.fetch(ContentType::Article.endpoint(), &params).await {
            Ok(_) => {
                tracing::info!("Content API reachable, serving live content");
                Connectivity::Live
            }
            Err(err) => {
                tracing::info!(error = %err, "Content API unreachable, serving fallback content");
                Connectivity::Degraded
            }
        }
    }

    pub async fn articles(&self, connectivity: Connectivity, query: ContentQuery) -> Fetched<Vec<Article>> {
        self.list(connectivity, query).await
    }

    pub async fn article(&self, connectivity: Connectivity, identifier: &str) -> Fetched<Result<Article, LookupError>> {
        self.get(connectivity, identifier).await
    }

    pub async fn featured_articles(&self, connectivity: Connectivity) -> Fetched<Vec<Article>> {
        self.featured(connectivity, 1).await
    }

    pub async fn tutorials(&self, connectivity: Connectivity, query: ContentQuery) -> Fetched<Vec<Tutorial>> {
        self.list(connectivity, query).await
    }

    pub async fn tutorial(&self, connectivity: Connectivity, identifier: &str) -> Fetched<Result<Tutorial, LookupError>> {
        self.get(connectivity, identifier).await
    }

    pub async fn featured_tutorials(&self, connectivity: Connectivity) -> Fetched<Vec<Tutorial>> {
        self.featured(connectivity, 3).await
    }

    pub async fn videos(&self, connectivity: Connectivity, query: ContentQuery) -> Fetched<Vec<Video>> {
        self.list(connectivity, query).await
    }

    pub async fn video(&self, connectivity: Connectivity, identifier: &str) -> Fetched<Result<Video, LookupError>> {
        self.get(connectivity, identifier).await
    }

    pub async fn featured_videos(&self, connectivity: Connectivity) -> Fetched<Vec<Video>> {
        self.featured(connectivity, 1).await
    }

    pub async fn categories(&self, connectivity: Connectivity) -> Fetched<Vec<Category>> {
        self.list(connectivity, ContentQuery::new()).await
    }

    pub async fn tags(&self, connectivity: Connectivity) -> Fetched<Vec<Tag>> {
        self.list(connectivity, ContentQuery::new()).await
    }

    pub async fn search_articles(&self, connectivity: Connectivity, query: &str) -> Fetched<Vec<Article>> {
        self.search(connectivity, query).await
    }

    pub async fn search_tutorials(&self, connectivity: Connectivity, query: &str) -> Fetched<Vec<Tutorial>> {
        self.search(connectivity, query).await
    }

    pub async fn search_videos(&self, connectivity: Connectivity, query: &str) -> Fetched<Vec<Video>> {
        self.search(connectivity, query).await
    }
}

/// Apply the parts of a query that make sense locally: featured flag, title search and limit
///
/// Substitute content is never narrowed to nothing; when no record matches,
/// the whole fallback set is served.
fn narrow_fallback<T: ContentEntity>(records: Vec<T>, query: &ContentQuery) -> Vec<T> {
    let featured_only = query
        .filter_value("featured", FilterOperator::Eq)
        .map_or(false, |v| v.eq_ignore_ascii_case("true"));
    let needle = query
        .filter_value("title", FilterOperator::ContainsI)
        .map(str::to_lowercase);

    let narrowed: Vec<T> = records
        .iter()
        .filter(|r| !featured_only || r.featured())
        .filter(|r| needle.as_ref().map_or(true, |n| r.title().to_lowercase().contains(n)))
        .cloned()
        .collect();
    let mut records = if narrowed.is_empty() { records } else { narrowed };

    if let Some(limit) = query.pagination.as_ref().and_then(|p| p.limit.or(p.page_size)) {
        records.truncate(limit as usize);
    }
    records
}

fn decode_record<T: ContentEntity>(value: Value) -> Result<T, String> {
    let record: T = serde_json::from_value(normalize_entity(value)).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}

fn take_data(body: Value) -> Result<(Value, Option<PaginationMeta>), FetchError> {
    let Value::Object(mut envelope) = body else {
        return Err(FetchError::Decode("expected a JSON object envelope".to_string()));
    };
    let pagination = envelope
        .get("meta")
        .and_then(|meta| meta.get("pagination"))
        .cloned()
        .and_then(|p| serde_json::from_value(p).ok());
    let data = envelope
        .remove("data")
        .ok_or_else(|| FetchError::Decode("missing `data` field".to_string()))?;
    Ok((data, pagination))
}

/// Decode a list envelope, dropping records that fail validation
fn decode_list<T: ContentEntity>(body: Value) -> Result<(Vec<T>, Option<PaginationMeta>), FetchError> {
    let (data, pagination) = take_data(body)?;
    let Value::Array(items) = data else {
        return Err(FetchError::Decode("expected `data` to be an array".to_string()));
    };

    let records = items
        .into_iter()
        .filter_map(|item| match decode_record::<T>(item) {
            Ok(record) => Some(record),
            Err(reason) => {
                tracing::warn!(content_type = %T::CONTENT_TYPE, %reason, "Dropping invalid record");
                None
            }
        })
        .collect();

    Ok((records, pagination))
}

/// Decode a single-record envelope; `data: null` means not found
fn decode_one<T: ContentEntity>(body: Value) -> Result<Option<T>, FetchError> {
    let (data, _) = take_data(body)?;
    let item = match data {
        Value::Null => return Ok(None),
        Value::Array(items) => match items.into_iter().next() {
            Some(item) => item,
            None => return Ok(None),
        },
        other => other,
    };
    decode_record::<T>(item).map(Some).map_err(FetchError::Decode)
}
