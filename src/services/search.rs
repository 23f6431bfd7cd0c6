//! Search across articles, tutorials and videos
//!
//! A search spawns one task per content type. Each task sends its panel
//! through a channel as soon as it resolves; there is no join barrier.
//! `SearchState` tags every search with a generation and drops panels that
//! belong to an older one.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::content::{Connectivity, ContentClient, Origin};
use crate::models::{Article, ContentType, Tutorial, Video};

/// How a search was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Explicit submission: any non-empty query runs
    #[default]
    Submit,
    /// Typing: runs once the query reaches the minimum length
    Input,
}

/// What to do with a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    Run(String),
    Clear,
    /// Too short to search while typing; keep the current results
    Keep,
}

/// Decide whether a query runs, clears or leaves results alone
pub fn decide(mode: SearchMode, query: &str, min_chars: usize) -> SearchAction {
    let query = query.trim();
    if query.is_empty() {
        return SearchAction::Clear;
    }
    match mode {
        SearchMode::Submit => SearchAction::Run(query.to_string()),
        SearchMode::Input if query.chars().count() >= min_chars => SearchAction::Run(query.to_string()),
        SearchMode::Input => SearchAction::Keep,
    }
}

/// Results for one content type
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum PanelResults {
    Articles(Vec<Article>),
    Tutorials(Vec<Tutorial>),
    Videos(Vec<Video>),
}

impl PanelResults {
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Articles(_) => ContentType::Article,
            Self::Tutorials(_) => ContentType::Tutorial,
            Self::Videos(_) => ContentType::Video,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Articles(items) => items.len(),
            Self::Tutorials(items) => items.len(),
            Self::Videos(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One resolved search panel
#[derive(Debug, Clone, Serialize)]
pub struct SearchPanel {
    pub generation: u64,
    pub results: PanelResults,
    pub origin: Origin,
    pub connectivity: Connectivity,
}

/// Spawns per-type search tasks
#[derive(Clone)]
pub struct SearchController {
    client: ContentClient,
}

impl SearchController {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }

    /// Start a search; panels arrive on the returned receiver in completion order
    pub fn spawn(&self, connectivity: Connectivity, query: &str, generation: u64) -> mpsc::Receiver<SearchPanel> {
        let (tx, rx) = mpsc::channel(ContentType::BROWSABLE.len());

        for content_type in ContentType::BROWSABLE {
            let controller = self.clone();
            let query = query.to_string();
            let tx = tx.clone();

            tokio::spawn(async move {
                let panel = controller.panel(connectivity, content_type, &query, generation).await;
                if tx.send(panel).await.is_err() {
                    tracing::debug!(%content_type, generation, "Search receiver dropped");
                }
            });
        }

        rx
    }

    /// Search one content type; non-browsable types are searched as articles
    pub async fn panel(
        &self,
        connectivity: Connectivity,
        content_type: ContentType,
        query: &str,
        generation: u64,
    ) -> SearchPanel {
        match content_type {
            ContentType::Tutorial => {
                let fetched = self.client.search_tutorials(connectivity, query).await;
                resolved(generation, fetched.origin, fetched.connectivity, PanelResults::Tutorials(fetched.data))
            }
            ContentType::Video => {
                let fetched = self.client.search_videos(connectivity, query).await;
                resolved(generation, fetched.origin, fetched.connectivity, PanelResults::Videos(fetched.data))
            }
            _ => {
                let fetched = self.client.search_articles(connectivity, query).await;
                resolved(generation, fetched.origin, fetched.connectivity, PanelResults::Articles(fetched.data))
            }
        }
    }

    /// Run a search to completion and fold every panel into `state`
    pub async fn run(&self, state: &mut SearchState, connectivity: Connectivity, query: &str) {
        let generation = state.begin(query);
        let mut rx = self.spawn(connectivity, query, generation);
        while let Some(panel) = rx.recv().await {
            state.apply(panel);
        }
    }
}

fn resolved(generation: u64, origin: Origin, connectivity: Connectivity, results: PanelResults) -> SearchPanel {
    SearchPanel {
        generation,
        results,
        origin,
        connectivity,
    }
}

/// Search page state
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchState {
    pub generation: u64,
    pub query: String,
    pub has_searched: bool,
    pub articles: Option<Vec<Article>>,
    pub tutorials: Option<Vec<Tutorial>>,
    pub videos: Option<Vec<Video>>,
    pub connectivity: Connectivity,
}

impl SearchState {
    /// Start a new search generation, clearing previous panels
    pub fn begin(&mut self, query: &str) -> u64 {
        self.generation += 1;
        self.query = query.trim().to_string();
        self.has_searched = true;
        self.articles = None;
        self.tutorials = None;
        self.videos = None;
        self.generation
    }

    /// Clear results; in-flight panels of the previous search become stale
    pub fn clear(&mut self) {
        self.generation += 1;
        self.query.clear();
        self.has_searched = false;
        self.articles = None;
        self.tutorials = None;
        self.videos = None;
    }

    /// Apply a panel; returns false when it belongs to an older generation
    pub fn apply(&mut self, panel: SearchPanel) -> bool {
        if panel.generation != self.generation || !self.has_searched {
            tracing::debug!(panel = panel.generation, current = self.generation, "Ignoring stale search panel");
            return false;
        }
        if panel.connectivity.is_degraded() {
            self.connectivity = Connectivity::Degraded;
        }
        match panel.results {
            PanelResults::Articles(items) => self.articles = Some(items),
            PanelResults::Tutorials(items) => self.tutorials = Some(items),
            PanelResults::Videos(items) => self.videos = Some(items),
        }
        true
    }

    /// Some panel of the current search has not arrived yet
    pub fn is_searching(&self) -> bool {
        self.has_searched && (self.articles.is_none() || self.tutorials.is_none() || self.videos.is_none())
    }

    pub fn total_results(&self) -> usize {
        self.articles.as_ref().map_or(0, Vec::len)
            + self.tutorials.as_ref().map_or(0, Vec::len)
            + self.videos.as_ref().map_or(0, Vec::len)
    }
}

/// Suggested queries shown before the first search
pub const SUGGESTIONS: [&str; 5] = ["Unity", "Game Design", "Shaders", "Unreal Engine", "Mobile"];
