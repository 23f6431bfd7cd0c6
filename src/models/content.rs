//! Content types and the tagged content record
//!
//! This module provides:
//! - `ContentType` naming each collection served by the CMS
//! - `ContentRecord`, a tagged union over every typed record
//! - `ContentEntity`, the trait shared by typed records
//! - Wire helpers that accept both wrapped (`{"data": ...}`) and flattened relations

use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::{Article, Category, Tag, Tutorial, Video};

/// A named collection served by the CMS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Article,
    Tutorial,
    Video,
    Category,
    Tag,
}

impl ContentType {
    /// Content types that have list and detail pages
    pub const BROWSABLE: [ContentType; 3] = [Self::Article, Self::Tutorial, Self::Video];

    /// API collection name (`articles`, `tutorials`, ...)
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Article => "articles",
            Self::Tutorial => "tutorials",
            Self::Video => "videos",
            Self::Category => "categories",
            Self::Tag => "tags",
        }
    }

    /// Human readable plural label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Article => "Articles",
            Self::Tutorial => "Tutorials",
            Self::Video => "Videos",
            Self::Category => "Categories",
            Self::Tag => "Tags",
        }
    }

    /// Site path of the list page; categories and tags have none and map home
    pub fn list_path(&self) -> &'static str {
        match self {
            Self::Article => "/articles",
            Self::Tutorial => "/tutorials",
            Self::Video => "/videos",
            Self::Category | Self::Tag => "/",
        }
    }

    /// Site path of a detail page
    pub fn detail_path(&self, document_id: &str) -> String {
        format!("{}/{}", self.list_path(), urlencoding::encode(document_id))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Error returned when parsing an unknown content type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "article" | "articles" => Ok(Self::Article),
            "tutorial" | "tutorials" => Ok(Self::Tutorial),
            "video" | "videos" => Ok(Self::Video),
            "category" | "categories" => Ok(Self::Category),
            "tag" | "tags" => Ok(Self::Tag),
            other => Err(UnknownContentType(other.to_string())),
        }
    }
}

/// A record rejected at the API boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{content_type} record {id} is missing {field}")]
pub struct ValidationError {
    pub content_type: ContentType,
    pub id: i64,
    pub field: &'static str,
}

/// Any typed record served by the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "record", rename_all = "snake_case")]
pub enum ContentRecord {
    Article(Article),
    Tutorial(Tutorial),
    Video(Video),
    Category(Category),
    Tag(Tag),
}

impl ContentRecord {
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Article(_) => ContentType::Article,
            Self::Tutorial(_) => ContentType::Tutorial,
            Self::Video(_) => ContentType::Video,
            Self::Category(_) => ContentType::Category,
            Self::Tag(_) => ContentType::Tag,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Article(a) => a.title(),
            Self::Tutorial(t) => t.title(),
            Self::Video(v) => v.title(),
            Self::Category(c) => c.title(),
            Self::Tag(t) => t.title(),
        }
    }
}

/// Behaviour shared by every typed content record
pub trait ContentEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const CONTENT_TYPE: ContentType;

    fn id(&self) -> i64;
    fn document_id(&self) -> &str;
    fn slug(&self) -> &str;
    /// Display title (name for categories and tags)
    fn title(&self) -> &str;

    fn into_record(self) -> ContentRecord;
    fn from_record(record: ContentRecord) -> Option<Self>;

    /// Editorially featured; types without the flag are never featured
    fn featured(&self) -> bool {
        false
    }

    /// Reject records the views cannot render
    fn validate(&self) -> Result<(), ValidationError> {
        if self.document_id().trim().is_empty() {
            return Err(ValidationError {
                content_type: Self::CONTENT_TYPE,
                id: self.id(),
                field: "documentId",
            });
        }
        if self.title().trim().is_empty() {
            return Err(ValidationError {
                content_type: Self::CONTENT_TYPE,
                id: self.id(),
                field: "title",
            });
        }
        Ok(())
    }

    /// Whether a path identifier refers to this record (document id, numeric id or slug)
    fn matches_identifier(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return false;
        }
        self.document_id() == identifier
            || self.slug() == identifier
            || identifier.parse::<i64>().map_or(false, |id| id == self.id())
    }
}

macro_rules! content_entity {
    ($ty:ident, $variant:ident, $title:ident, featured) => {
        content_entity!($ty, $variant, $title, {
            fn featured(&self) -> bool {
                self.featured
            }
        });
    };
    ($ty:ident, $variant:ident, $title:ident) => {
        content_entity!($ty, $variant, $title, {});
    };
    ($ty:ident, $variant:ident, $title:ident, { $($extra:tt)* }) => {
        impl ContentEntity for $ty {
            const CONTENT_TYPE: ContentType = ContentType::$variant;

            fn id(&self) -> i64 {
                self.id
            }

            fn document_id(&self) -> &str {
                &self.document_id
            }

            fn slug(&self) -> &str {
                &self.slug
            }

            fn title(&self) -> &str {
                &self.$title
            }

            fn into_record(self) -> ContentRecord {
                ContentRecord::$variant(self)
            }

            fn from_record(record: ContentRecord) -> Option<Self> {
                match record {
                    ContentRecord::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            $($extra)*
        }
    };
}

content_entity!(Article, Article, title, featured);
content_entity!(Tutorial, Tutorial, title, featured);
content_entity!(Video, Video, title, featured);
content_entity!(Category, Category, name);
content_entity!(Tag, Tag, name);

// ============================================================================
// Wire normalization
// ============================================================================

/// Normalize one wire entity: unwrap `{"data": x}` and merge v4-style `attributes`
pub fn normalize_entity(value: Value) -> Value {
    let value = match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    match value {
        Value::Object(mut map) => {
            if let Some(Value::Object(attributes)) = map.remove("attributes") {
                for (key, attr) in attributes {
                    map.entry(key).or_insert(attr);
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Deserialize an optional to-one relation in either wire shape
pub mod relation {
    use super::*;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        match value.map(normalize_entity) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
        }
    }
}

/// Deserialize a to-many relation in either wire shape
pub mod relation_list {
    use super::*;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let items = match value.map(normalize_entity) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => vec![other],
        };
        items
            .into_iter()
            .map(|item| serde_json::from_value(normalize_entity(item)).map_err(D::Error::custom))
            .collect()
    }
}

/// Deserialize a display string that the CMS may send as a number
pub mod display_string {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(other) => Err(D::Error::custom(format!("expected string, got {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_type_parse_and_paths() {
        assert_eq!("articles".parse::<ContentType>().unwrap(), ContentType::Article);
        assert_eq!("Video".parse::<ContentType>().unwrap(), ContentType::Video);
        assert!("podcasts".parse::<ContentType>().is_err());

        assert_eq!(ContentType::Tutorial.endpoint(), "tutorials");
        assert_eq!(ContentType::Video.list_path(), "/videos");
        assert_eq!(ContentType::Article.detail_path("article-1"), "/articles/article-1");
        assert_eq!(ContentType::Article.detail_path("a b"), "/articles/a%20b");
    }

    #[test]
    fn test_normalize_unwraps_data_and_attributes() {
        let wrapped = json!({ "data": { "id": 3, "attributes": { "name": "Unity", "slug": "unity" } } });
        let normalized = normalize_entity(wrapped);
        assert_eq!(normalized["id"], 3);
        assert_eq!(normalized["name"], "Unity");
        assert!(normalized.get("attributes").is_none());

        let flat = json!({ "id": 1, "name": "Art" });
        assert_eq!(normalize_entity(flat.clone()), flat);
    }

    #[test]
    fn test_relation_accepts_wrapped_flat_and_null() {
        let wrapped: Article = serde_json::from_value(json!({
            "id": 1, "documentId": "a1", "title": "T", "slug": "t",
            "category": { "data": { "id": 2, "documentId": "c2", "name": "Art", "slug": "art" } },
            "tags": { "data": [ { "id": 5, "documentId": "t5", "name": "Unity", "slug": "unity" } ] }
        }))
        .unwrap();
        assert_eq!(wrapped.category.as_ref().unwrap().name, "Art");
        assert_eq!(wrapped.tags.len(), 1);

        let flat: Article = serde_json::from_value(json!({
            "id": 1, "documentId": "a1", "title": "T", "slug": "t",
            "category": { "id": 2, "documentId": "c2", "name": "Art", "slug": "art" },
            "tags": [ { "id": 5, "documentId": "t5", "name": "Unity", "slug": "unity" } ]
        }))
        .unwrap();
        assert_eq!(flat.category.as_ref().unwrap().slug, "art");
        assert_eq!(flat.tags[0].name, "Unity");

        let empty: Article = serde_json::from_value(json!({
            "id": 1, "documentId": "a1", "title": "T", "slug": "t",
            "category": { "data": null }, "tags": null
        }))
        .unwrap();
        assert!(empty.category.is_none());
        assert!(empty.tags.is_empty());
    }

    #[test]
    fn test_display_string_accepts_numbers() {
        let article: Article = serde_json::from_value(json!({
            "id": 1, "documentId": "a1", "title": "T", "slug": "t", "views": 1250
        }))
        .unwrap();
        assert_eq!(article.views, "1250");
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let article: Article = serde_json::from_value(json!({
            "id": 9, "documentId": "a9", "title": "  ", "slug": "x"
        }))
        .unwrap();
        let err = article.validate().unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.id, 9);
    }

    #[test]
    fn test_matches_identifier() {
        let article: Article = serde_json::from_value(json!({
            "id": 7, "documentId": "abc123", "title": "T", "slug": "the-slug"
        }))
        .unwrap();
        assert!(article.matches_identifier("abc123"));
        assert!(article.matches_identifier("7"));
        assert!(article.matches_identifier("the-slug"));
        assert!(!article.matches_identifier("8"));
        assert!(!article.matches_identifier(""));
    }

    #[test]
    fn test_record_roundtrip_through_tag() {
        let tag: Tag = serde_json::from_value(json!({
            "id": 1, "documentId": "tag-1", "name": "Unity", "slug": "unity"
        }))
        .unwrap();
        let record = tag.into_record();
        assert_eq!(record.content_type(), ContentType::Tag);
        assert_eq!(record.title(), "Unity");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "tag");
        assert!(Article::from_record(record.clone()).is_none());
        assert_eq!(Tag::from_record(record).unwrap().slug, "unity");
    }
}
