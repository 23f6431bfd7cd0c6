//! Tutorial model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::content::{display_string, relation, relation_list};
use super::{Category, Media, Person, Tag};

/// Tutorial difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

/// One chapter of a tutorial
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TutorialChapter {
    pub title: String,
    /// Length label ("15:30")
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

/// Tutorial entity as served by the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: i64,
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Optional long-form body (rich text)
    #[serde(default)]
    pub content: Option<String>,
    /// Total length label ("4h 30m")
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub duration: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub publish_date: String,
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub views: String,
    #[serde(default, deserialize_with = "display_string::deserialize")]
    pub likes: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub total_ratings: Option<u32>,
    #[serde(default)]
    pub what_you_learn: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub chapters: Vec<TutorialChapter>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub instructor: Option<Person>,
    #[serde(default, deserialize_with = "relation_list::deserialize")]
    pub tags: Vec<Tag>,
    /// Primary cover image
    #[serde(default, deserialize_with = "relation::deserialize")]
    pub thumbnail: Option<Media>,
    /// Additional cover images
    #[serde(default, deserialize_with = "relation_list::deserialize")]
    pub images: Vec<Media>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Tutorial {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// First available cover image
    pub fn cover(&self) -> Option<&Media> {
        self.thumbnail.as_ref().or_else(|| self.images.first())
    }
}
