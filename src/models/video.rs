//! Video model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{display_string, relation, relation_list, ContentType};
use super::{Category, Media, Person, Tag};

/// One chapter marker of a video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoChapter {
    pub title: String,
    /// Start offset label ("3:20")
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub duration: String,
}

/// Reference from a video to the article or tutorial it accompanies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedContent {
    #[serde(default)]
    pub id: i64,
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Video entity as served by the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i64,
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Length label ("45:30")
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub duration: String,
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub views: String,
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub likes: String,
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub publish_date: String,
    #[serde(default)]
    pub featured: bool,
    /// External player URL
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub chapters: Vec<VideoChapter>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub article: Option<LinkedContent>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub tutorial: Option<LinkedContent>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub creator: Option<Person>,
    #[serde(default, deserialize_with = "relation_list::deserialize")]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub thumbnail: Option<Media>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Video {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// The linked article or tutorial; articles win when both are set
    pub fn linked(&self) -> Option<(ContentType, &LinkedContent)> {
        self.article
            .as_ref()
            .map(|a| (ContentType::Article, a))
            .or_else(|| self.tutorial.as_ref().map(|t| (ContentType::Tutorial, t)))
    }
}
