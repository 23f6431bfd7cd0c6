//! Tag model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity as served by the CMS
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub document_id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(id: i64, document_id: &str, name: &str, slug: &str) -> Self {
        Self {
            id,
            document_id: document_id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: None,
            updated_at: None,
        }
    }
}
