//! List pages: filtering and loading
//!
//! Filtering is a pure function of the loaded records and the current
//! `ListFilter`, recomputed from the full set on every request. Selecting
//! "All" therefore always restores the unfiltered list.

use serde::{Deserialize, Serialize};

use crate::content::{Connectivity, ContentClient, ContentQuery, Origin};
use crate::models::{Article, Category, ContentEntity, Difficulty, Tutorial, Video, ALL_CATEGORIES};

/// A record that can appear on a list page
pub trait Listable: ContentEntity {
    /// Related records shown on the detail page
    const RELATED_LIMIT: usize = 3;

    /// Summary line (excerpt or description)
    fn summary(&self) -> &str;
    fn category_label(&self) -> Option<&str>;
    fn tag_labels(&self) -> Vec<&str>;

    fn difficulty(&self) -> Option<Difficulty> {
        None
    }
}

impl Listable for Article {
    fn summary(&self) -> &str {
        &self.excerpt
    }

    fn category_label(&self) -> Option<&str> {
        self.category_name()
    }

    fn tag_labels(&self) -> Vec<&str> {
        self.tag_names()
    }
}

impl Listable for Tutorial {
    fn summary(&self) -> &str {
        &self.description
    }

    fn category_label(&self) -> Option<&str> {
        self.category_name()
    }

    fn tag_labels(&self) -> Vec<&str> {
        self.tag_names()
    }

    fn difficulty(&self) -> Option<Difficulty> {
        Some(self.difficulty)
    }
}

impl Listable for Video {
    const RELATED_LIMIT: usize = 4;

    fn summary(&self) -> &str {
        &self.description
    }

    fn category_label(&self) -> Option<&str> {
        self.category_name()
    }

    fn tag_labels(&self) -> Vec<&str> {
        self.tag_names()
    }
}

/// Filter state of a list page, as carried in the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    /// Category or tag name; `None` or "All" means no restriction
    #[serde(default)]
    pub category: Option<String>,
    /// Keyword matched against title and summary
    #[serde(default)]
    pub q: Option<String>,
    /// Difficulty name (tutorials only)
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl ListFilter {
    pub fn select_category(&mut self, category: &str) {
        self.category = Some(category.to_string());
    }

    pub fn select_difficulty(&mut self, difficulty: &str) {
        self.difficulty = Some(difficulty.to_string());
    }

    /// Active category, `None` when unset or "All"
    pub fn active_category(&self) -> Option<&str> {
        active(self.category.as_deref())
    }

    /// Active difficulty; unknown names restrict nothing
    pub fn active_difficulty(&self) -> Option<Difficulty> {
        active(self.difficulty.as_deref()).and_then(|d| d.parse().ok())
    }

    pub fn keyword(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active_category().is_none() && self.active_difficulty().is_none() && self.keyword().is_none()
    }

    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        if let Some(category) = self.active_category() {
            let category = category.to_lowercase();
            let in_category = item
                .category_label()
                .map_or(false, |name| name.to_lowercase() == category);
            let tagged = item.tag_labels().iter().any(|tag| tag.to_lowercase() == category);
            if !in_category && !tagged {
                return false;
            }
        }

        if let Some(difficulty) = self.active_difficulty() {
            if item.difficulty().map_or(false, |d| d != difficulty) {
                return false;
            }
        }

        if let Some(keyword) = self.keyword() {
            let keyword = keyword.to_lowercase();
            let hit = item.title().to_lowercase().contains(&keyword)
                || item.summary().to_lowercase().contains(&keyword);
            if !hit {
                return false;
            }
        }

        true
    }

    pub fn apply<T: Listable>(&self, items: &[T]) -> Vec<T> {
        items.iter().filter(|item| self.matches(*item)).cloned().collect()
    }
}

fn active(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_CATEGORIES))
}

/// Data behind a list page
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    /// Records after filtering
    pub items: Vec<T>,
    /// Records loaded before filtering
    pub total: usize,
    /// Category chips, "All" first
    pub categories: Vec<Category>,
    pub filter: ListFilter,
    pub origin: Origin,
    pub connectivity: Connectivity,
}

/// Loads list pages through the content client
#[derive(Clone)]
pub struct ListController {
    client: ContentClient,
    limit: u32,
}

impl ListController {
    pub fn new(client: ContentClient, limit: u32) -> Self {
        Self { client, limit: limit.max(1) }
    }

    pub async fn load<T: Listable>(&self, connectivity: Connectivity, filter: ListFilter) -> ListPage<T> {
        let (records, categories) = tokio::join!(
            self.client.list::<T>(connectivity, ContentQuery::new().limit(self.limit)),
            self.client.categories(connectivity),
        );

        let connectivity = worst(records.connectivity, categories.connectivity);
        let items = filter.apply(&records.data);

        ListPage {
            total: records.data.len(),
            items,
            categories: with_all_first(categories.data),
            filter,
            origin: records.origin,
            connectivity,
        }
    }
}

/// Combine the connectivity returned by concurrent calls
pub fn worst(a: Connectivity, b: Connectivity) -> Connectivity {
    if a.is_degraded() || b.is_degraded() {
        Connectivity::Degraded
    } else {
        Connectivity::Live
    }
}

fn with_all_first(mut categories: Vec<Category>) -> Vec<Category> {
    match categories.iter().position(Category::is_all) {
        Some(0) => {}
        Some(idx) => {
            let all = categories.remove(idx);
            categories.insert(0, all);
        }
        None => categories.insert(0, Category::new(0, "all", ALL_CATEGORIES, "all", None)),
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::MockSource;
    use crate::content::{FallbackProvider, FallbackReason, FetchError};
    use serde_json::json;
    use std::sync::Arc;

    fn tutorials() -> Vec<Tutorial> {
        FallbackProvider.list::<Tutorial>()
    }

    #[test]
    fn test_category_matches_category_or_tag() {
        let items = tutorials();
        let mut filter = ListFilter::default();

        filter.select_category("programming");
        let titles: Vec<String> = filter.apply(&items).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Unity 2D Game Development Masterclass", "Complete C# Programming for Games"]);

        filter.select_category("C#");
        assert_eq!(filter.apply(&items).len(), 1);

        filter.select_category("Unit");
        assert!(filter.apply(&items).is_empty());
    }

    #[test]
    fn test_category_match_ignores_unicode_case() {
        let mut items = tutorials();
        items[0].category = Some(Category::new(9, "c9", "Économie", "economie", None));
        let mut filter = ListFilter::default();

        filter.select_category("ÉCONOMIE");
        let found = filter.apply(&items);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].document_id, items[0].document_id);

        filter.select_category("économie");
        assert_eq!(filter.apply(&items).len(), 1);
    }

    #[test]
    fn test_all_resets_category() {
        let items = tutorials();
        let mut filter = ListFilter::default();
        filter.select_category("Art");
        assert_eq!(filter.apply(&items).len(), 1);

        filter.select_category("All");
        assert_eq!(filter.apply(&items).len(), items.len());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_difficulty_filter() {
        let items = tutorials();
        let mut filter = ListFilter::default();
        filter.select_difficulty("advanced");
        let found = filter.apply(&items);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].difficulty, Difficulty::Advanced);

        filter.select_difficulty("All");
        assert_eq!(filter.apply(&items).len(), 3);
    }

    #[test]
    fn test_keyword_matches_title_or_summary() {
        let articles = FallbackProvider.list::<Article>();
        let filter = ListFilter { q: Some("  WORLDS ".to_string()), ..ListFilter::default() };
        assert_eq!(filter.apply(&articles).len(), 1);

        let filter = ListFilter { q: Some("frustrating".to_string()), ..ListFilter::default() };
        let found = filter.apply(&articles);
        assert_eq!(found[0].title, "The Art of Game Balance");
    }

    #[test]
    fn test_difficulty_ignored_for_videos() {
        let videos = FallbackProvider.list::<Video>();
        let filter = ListFilter { difficulty: Some("Beginner".to_string()), ..ListFilter::default() };
        assert_eq!(filter.apply(&videos).len(), videos.len());
    }

    #[test]
    fn test_with_all_first() {
        let cats = vec![
            Category::new(2, "c2", "Art", "art", None),
            Category::new(1, "c1", "All", "all", None),
        ];
        let ordered = with_all_first(cats);
        assert_eq!(ordered[0].name, "All");
        assert_eq!(ordered.len(), 2);

        let synthesized = with_all_first(vec![Category::new(2, "c2", "Art", "art", None)]);
        assert_eq!(synthesized[0].name, "All");
        assert_eq!(synthesized.len(), 2);
    }

    #[tokio::test]
    async fn test_load_combines_connectivity_and_limit() {
        let source = MockSource::failing(FetchError::Transport("down".into()))
            .with("categories", Ok(json!({ "data": [{ "id": 1, "documentId": "c1", "name": "Art", "slug": "art" }] })));
        let source = Arc::new(source);
        let controller = ListController::new(ContentClient::new(source.clone(), FallbackProvider), 10);

        let page = controller.load::<Article>(Connectivity::Live, ListFilter::default()).await;

        assert_eq!(page.connectivity, Connectivity::Degraded);
        assert!(matches!(page.origin, Origin::Fallback(FallbackReason::Failed(_))));
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.categories[0].name, "All");
        assert_eq!(page.categories[1].name, "Art");

        let calls = source.calls();
        let (_, params) = calls.iter().find(|(path, _)| path == "articles").unwrap();
        assert!(params.contains(&("pagination[limit]".to_string(), "10".to_string())));
    }
}
