//! People credited on content: article authors, tutorial instructors, video creators

use serde::{Deserialize, Serialize};

use super::content::relation;
use super::Media;

/// Author, instructor or creator profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub document_id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub bio: String,
    /// Instructors only
    #[serde(default)]
    pub experience: Option<String>,
    /// Video creators only
    #[serde(default)]
    pub subscriber_count: Option<String>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub avatar: Option<Media>,
}

impl Person {
    pub fn new(id: i64, document_id: &str, name: &str, slug: &str, bio: &str) -> Self {
        Self {
            id,
            document_id: document_id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            bio: bio.to_string(),
            experience: None,
            subscriber_count: None,
            avatar: None,
        }
    }
}
