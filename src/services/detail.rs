//! Detail pages
//!
//! A detail load moves `Loading -> Loaded | NotFound | Error` and then stays
//! put. A not-found load produces exactly one redirect to the list page.

use serde::Serialize;

use super::format::Formatter;
use super::listing::{worst, Listable};
use crate::content::{Connectivity, ContentClient, ContentQuery, LookupError, Origin};
use crate::models::{Tutorial, Video};

/// Load state of a detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum DetailState<T> {
    Loading,
    Loaded(T),
    NotFound,
    Error(String),
}

impl<T> DetailState<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Apply a lookup outcome; terminal states ignore further outcomes
    pub fn resolve(self, outcome: Result<T, LookupError>) -> Self {
        if self.is_terminal() {
            return self;
        }
        match outcome {
            Ok(record) => Self::Loaded(record),
            Err(LookupError::NotFound { .. }) | Err(LookupError::MissingIdentifier) => Self::NotFound,
            Err(LookupError::Unavailable(err)) => Self::Error(err.to_string()),
        }
    }
}

/// One detail page load
#[derive(Debug)]
pub struct DetailLoad<T> {
    state: DetailState<T>,
    list_path: &'static str,
    redirected: bool,
}

impl<T: Listable> DetailLoad<T> {
    pub fn new() -> Self {
        Self {
            state: DetailState::Loading,
            list_path: T::CONTENT_TYPE.list_path(),
            redirected: false,
        }
    }

    pub fn state(&self) -> &DetailState<T> {
        &self.state
    }

    pub fn resolve(&mut self, outcome: Result<T, LookupError>) {
        let state = std::mem::replace(&mut self.state, DetailState::Loading);
        self.state = state.resolve(outcome);
    }

    /// The list path to redirect to, returned once for a not-found load
    pub fn take_redirect(&mut self) -> Option<&'static str> {
        if matches!(self.state, DetailState::NotFound) && !self.redirected {
            self.redirected = true;
            return Some(self.list_path);
        }
        None
    }

    pub fn into_state(self) -> DetailState<T> {
        self.state
    }
}

impl<T: Listable> Default for DetailLoad<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of loading a detail page
#[derive(Debug)]
pub enum DetailOutcome<T> {
    Render(DetailPage<T>),
    Redirect(&'static str),
    Unavailable(String),
}

/// Data behind a rendered detail page
#[derive(Debug, Clone, Serialize)]
pub struct DetailPage<T> {
    pub record: T,
    pub related: Vec<T>,
    pub origin: Origin,
    pub connectivity: Connectivity,
}

/// Loads detail pages through the content client
#[derive(Clone)]
pub struct DetailController {
    client: ContentClient,
}

impl DetailController {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }

    /// Load a record and its related records; returns the outcome and the resulting connectivity
    pub async fn load<T: Listable>(&self, connectivity: Connectivity, identifier: &str) -> (DetailOutcome<T>, Connectivity) {
        let mut load = DetailLoad::<T>::new();

        let fetched = self.client.get::<T>(connectivity, identifier).await;
        let connectivity = fetched.connectivity;
        let origin = fetched.origin;
        load.resolve(fetched.data);

        if let Some(list_path) = load.take_redirect() {
            tracing::debug!(content_type = %T::CONTENT_TYPE, identifier, "Not found, redirecting to list");
            return (DetailOutcome::Redirect(list_path), connectivity);
        }

        match load.into_state() {
            DetailState::Loaded(record) => {
                let (related, connectivity) = self.related(connectivity, &record).await;
                let page = DetailPage {
                    record,
                    related,
                    origin,
                    connectivity,
                };
                (DetailOutcome::Render(page), connectivity)
            }
            DetailState::Error(message) => (DetailOutcome::Unavailable(message), connectivity),
            DetailState::NotFound | DetailState::Loading => {
                (DetailOutcome::Redirect(T::CONTENT_TYPE.list_path()), connectivity)
            }
        }
    }

    /// Up to `T::RELATED_LIMIT` other records of the same type
    async fn related<T: Listable>(&self, connectivity: Connectivity, current: &T) -> (Vec<T>, Connectivity) {
        let limit = T::RELATED_LIMIT as u32 + 1;
        let fetched = self.client.list::<T>(connectivity, ContentQuery::new().limit(limit)).await;
        let related = fetched
            .data
            .into_iter()
            .filter(|r| r.document_id() != current.document_id())
            .take(T::RELATED_LIMIT)
            .collect();
        (related, worst(connectivity, fetched.connectivity))
    }
}

/// Derived figures for a tutorial page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorialFacts {
    pub difficulty_color: &'static str,
    pub chapter_count: usize,
    pub total_seconds: Option<u32>,
    pub instructor_initials: String,
}

impl TutorialFacts {
    pub fn new(tutorial: &Tutorial, formatter: &Formatter) -> Self {
        let chapter_seconds: Option<u32> = tutorial
            .chapters
            .iter()
            .map(|c| formatter.duration_seconds(&c.duration))
            .sum();
        Self {
            difficulty_color: formatter.difficulty_color(tutorial.difficulty),
            chapter_count: tutorial.chapters.len(),
            total_seconds: formatter.duration_seconds(&tutorial.duration).or(chapter_seconds),
            instructor_initials: tutorial
                .instructor
                .as_ref()
                .map(|p| formatter.initials(&p.name))
                .unwrap_or_default(),
        }
    }
}

/// Derived figures for a video page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoFacts {
    /// Start offset of each chapter in seconds (unparseable offsets count as 0)
    pub chapter_offsets: Vec<u32>,
    pub duration_seconds: u32,
    pub creator_initials: String,
}

impl VideoFacts {
    pub fn new(video: &Video, formatter: &Formatter) -> Self {
        Self {
            chapter_offsets: video
                .chapters
                .iter()
                .map(|c| formatter.duration_seconds(&c.time).unwrap_or(0))
                .collect(),
            duration_seconds: formatter.duration_seconds(&video.duration).unwrap_or(0),
            creator_initials: video
                .creator
                .as_ref()
                .map(|p| formatter.initials(&p.name))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::MockSource;
    use crate::content::{FallbackProvider, FetchError};
    use crate::models::Article;
    use std::sync::Arc;

    fn controller(source: MockSource) -> DetailController {
        DetailController::new(ContentClient::new(Arc::new(source), FallbackProvider))
    }

    fn not_found() -> LookupError {
        LookupError::NotFound {
            content_type: crate::models::ContentType::Article,
            identifier: "x".to_string(),
        }
    }

    #[test]
    fn test_terminal_states_absorb() {
        let state: DetailState<u8> = DetailState::Loading;
        let state = state.resolve(Err(not_found()));
        assert_eq!(state, DetailState::NotFound);

        let state = state.resolve(Ok(1));
        assert_eq!(state, DetailState::NotFound);

        let loaded = DetailState::Loading.resolve(Ok(7u8));
        assert_eq!(loaded.clone().resolve(Err(LookupError::Unavailable(FetchError::Status(500)))), loaded);
    }

    #[test]
    fn test_unavailable_is_error_not_not_found() {
        let state: DetailState<u8> = DetailState::Loading.resolve(Err(LookupError::Unavailable(FetchError::Status(502))));
        assert_eq!(state, DetailState::Error("Content API returned HTTP 502".to_string()));
    }

    #[test]
    fn test_redirect_issued_once() {
        let mut load = DetailLoad::<Article>::new();
        assert_eq!(load.take_redirect(), None);

        load.resolve(Err(not_found()));
        assert_eq!(load.take_redirect(), Some("/articles"));
        assert_eq!(load.take_redirect(), None);
    }

    #[tokio::test]
    async fn test_unknown_identifier_redirects_to_list() {
        let controller = controller(MockSource::new());
        let (outcome, connectivity) = controller.load::<Video>(Connectivity::Degraded, "video-404").await;
        assert!(matches!(outcome, DetailOutcome::Redirect("/videos")));
        assert_eq!(connectivity, Connectivity::Degraded);
    }

    #[tokio::test]
    async fn test_live_failure_is_unavailable() {
        let controller = controller(MockSource::failing(FetchError::Transport("reset".into())));
        let (outcome, connectivity) = controller.load::<Article>(Connectivity::Live, "article-1").await;
        assert!(matches!(outcome, DetailOutcome::Unavailable(_)));
        assert_eq!(connectivity, Connectivity::Degraded);
    }

    #[tokio::test]
    async fn test_related_excludes_current() {
        let controller = controller(MockSource::new());

        let (outcome, _) = controller.load::<Article>(Connectivity::Degraded, "article-2").await;
        let DetailOutcome::Render(page) = outcome else {
            panic!("expected a rendered page");
        };
        assert_eq!(page.record.document_id, "article-2");
        let related: Vec<&str> = page.related.iter().map(|a| a.document_id.as_str()).collect();
        assert_eq!(related, vec!["article-1", "article-3"]);

        let (outcome, _) = controller.load::<Video>(Connectivity::Degraded, "video-1").await;
        let DetailOutcome::Render(page) = outcome else {
            panic!("expected a rendered page");
        };
        assert_eq!(page.related.len(), 2);
        assert!(page.related.iter().all(|v| v.document_id != "video-1"));
    }

    #[test]
    fn test_tutorial_and_video_facts() {
        let formatter = Formatter::new("http://cms.local");

        let tutorial = FallbackProvider.find::<Tutorial>("tutorial-1").unwrap();
        let facts = TutorialFacts::new(&tutorial, &formatter);
        assert_eq!(facts.difficulty_color, "#10b981");
        assert_eq!(facts.chapter_count, 3);
        assert_eq!(facts.total_seconds, Some(16200));
        assert_eq!(facts.instructor_initials, "DP");

        let video = FallbackProvider.find::<Video>("video-1").unwrap();
        let facts = VideoFacts::new(&video, &formatter);
        assert_eq!(facts.chapter_offsets, vec![0, 200, 665]);
        assert_eq!(facts.duration_seconds, 2730);
        assert_eq!(facts.creator_initials, "GA");
    }
}
