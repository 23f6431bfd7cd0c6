//! Category model
//!
//! Categories group articles, tutorials and videos on the list pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity as served by the CMS
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Numeric identifier
    pub id: i64,
    /// Stable document identifier
    pub document_id: String,
    /// Category name
    pub name: String,
    /// URL-friendly slug
    #[serde(default)]
    pub slug: String,
    /// Category description
    #[serde(default)]
    pub description: Option<String>,
    /// Display color (CSS hex)
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Neutral color used when a category has none
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

/// Name of the pseudo-category that resets list filtering
pub const ALL_CATEGORIES: &str = "All";

impl Category {
    /// Create a category without timestamps
    pub fn new(id: i64, document_id: &str, name: &str, slug: &str, color: Option<&str>) -> Self {
        Self {
            id,
            document_id: document_id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            color: color.map(str::to_string),
            created_at: None,
            updated_at: None,
        }
    }

    /// Display color, falling back to neutral gray
    pub fn display_color(&self) -> &str {
        self.color
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY_COLOR)
    }

    /// Whether this is the "All" pseudo-category
    pub fn is_all(&self) -> bool {
        self.name.eq_ignore_ascii_case(ALL_CATEGORIES) || self.slug == "all"
    }
}
