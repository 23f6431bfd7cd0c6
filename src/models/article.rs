//! Article model
//!
//! This module provides:
//! - `Article`, a long-form post with rich-text body
//! - Helpers shared by list filtering (category and tag names)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{display_string, relation, relation_list};
use super::{Category, Media, Person, Tag};

/// Article entity as served by the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Numeric identifier
    pub id: i64,
    /// Stable document identifier used in detail URLs
    pub document_id: String,
    /// Article title
    pub title: String,
    /// URL-friendly slug
    #[serde(default)]
    pub slug: String,
    /// Rich-text body (markdown or HTML)
    #[serde(default)]
    pub content: String,
    /// Short summary shown on cards
    #[serde(default)]
    pub excerpt: String,
    /// Estimated reading time label ("8 min")
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub read_time: String,
    /// Whether the article is highlighted on the home page
    #[serde(default)]
    pub featured: bool,
    /// Editorial publish date as entered in the CMS
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub publish_date: String,
    /// View count label
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub views: String,
    /// Like count label
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub likes: String,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub author: Option<Person>,
    #[serde(default, deserialize_with = "relation_list::deserialize")]
    pub tags: Vec<Tag>,
    /// Cover image
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub featured_image: Option<Media>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Category name, if any
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Names of all tags
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}
