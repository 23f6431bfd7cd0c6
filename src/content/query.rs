//! Content API query builder
//!
//! Builds the bracketed query-string encoding the CMS expects:
//!
//! ```text
//! populate=category,author
//! filters[title][$containsi]=unity
//! filters[category][slug][$eq]=art
//! sort=publishDate:desc
//! pagination[page]=1&pagination[pageSize]=10
//! fields=title,slug
//! publicationState=live
//! locale=en
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ContentType;

/// Filter comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Contains,
    /// Case-insensitive containment
    ContainsI,
    NotContains,
    StartsWith,
    EndsWith,
    Null,
    NotNull,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::In => "$in",
            Self::NotIn => "$notIn",
            Self::Contains => "$contains",
            Self::ContainsI => "$containsi",
            Self::NotContains => "$notContains",
            Self::StartsWith => "$startsWith",
            Self::EndsWith => "$endsWith",
            Self::Null => "$null",
            Self::NotNull => "$notNull",
        }
    }
}

/// One filter predicate: field path, operator, value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    /// Dotted field path (`category.slug`)
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterPredicate {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Query-string key, e.g. `filters[category][slug][$eq]`
    pub fn param_key(&self) -> String {
        let mut key = String::from("filters");
        for segment in self.field.split('.').filter(|s| !s.is_empty()) {
            key.push('[');
            key.push_str(segment);
            key.push(']');
        }
        key.push('[');
        key.push_str(self.operator.as_str());
        key.push(']');
        key
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key (`publishDate:desc`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Desc }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{}", self.field, direction)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field.trim(), direction.trim()),
            None => (s.trim(), "asc"),
        };
        if field.is_empty() {
            return Err(format!("Invalid sort key: {:?}", s));
        }
        let direction = match direction.to_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(format!("Invalid sort direction: {}", other)),
        };
        Ok(Self { field: field.to_string(), direction })
    }
}

/// Pagination parameters; page-based and offset-based keys may be mixed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self { page: Some(page), page_size: Some(page_size), ..Self::default() }
    }

    pub fn limit(limit: u32) -> Self {
        Self { limit: Some(limit), ..Self::default() }
    }

    pub fn offset(start: u32, limit: u32) -> Self {
        Self { start: Some(start), limit: Some(limit), ..Self::default() }
    }
}

/// Draft visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationState {
    Live,
    Preview,
}

impl PublicationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Preview => "preview",
        }
    }
}

/// A content API query
///
/// Every part is optional. `overlay` merges two queries part by part, the
/// overlaying query winning wherever it sets a part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentQuery {
    pub populate: Vec<String>,
    pub filters: Vec<FilterPredicate>,
    pub sort: Vec<SortKey>,
    pub pagination: Option<Pagination>,
    pub fields: Vec<String>,
    pub publication_state: Option<PublicationState>,
    pub locale: Option<String>,
}

impl ContentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default list query for a content type
    pub fn defaults_for(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Article | ContentType::Tutorial | ContentType::Video => {
                Self::lookup_defaults(content_type).sort(SortKey::desc("publishDate"))
            }
            ContentType::Category | ContentType::Tag => Self::new().sort(SortKey::asc("name")),
        }
    }

    /// Default single-record query for a content type
    pub fn lookup_defaults(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Article => Self::new().populate(["category", "author", "tags", "featuredImage"]),
            ContentType::Tutorial => Self::new().populate(["category", "instructor", "tags", "thumbnail"]),
            ContentType::Video => {
                Self::new().populate(["category", "creator", "tags", "thumbnail", "article", "tutorial"])
            }
            ContentType::Category | ContentType::Tag => Self::new(),
        }
    }

    /// Case-insensitive title search
    pub fn title_search(query: &str) -> Self {
        Self::new().filter("title", FilterOperator::ContainsI, query.trim())
    }

    /// Only featured records, at most `limit`
    pub fn featured(limit: u32) -> Self {
        Self::new()
            .filter("featured", FilterOperator::Eq, "true")
            .paginate(Pagination::limit(limit))
    }

    pub fn populate<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.populate.extend(relations.into_iter().map(Into::into));
        self
    }

    pub fn filter(mut self, field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        self.filters.push(FilterPredicate::new(field, operator, value));
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn limit(self, limit: u32) -> Self {
        self.paginate(Pagination::limit(limit))
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn publication_state(mut self, state: PublicationState) -> Self {
        self.publication_state = Some(state);
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Merge `other` over `self`; each part set in `other` replaces the same part here
    pub fn overlay(mut self, other: ContentQuery) -> Self {
        if !other.populate.is_empty() {
            self.populate = other.populate;
        }
        if !other.filters.is_empty() {
            self.filters = other.filters;
        }
        if !other.sort.is_empty() {
            self.sort = other.sort;
        }
        if other.pagination.is_some() {
            self.pagination = other.pagination;
        }
        if !other.fields.is_empty() {
            self.fields = other.fields;
        }
        if other.publication_state.is_some() {
            self.publication_state = other.publication_state;
        }
        if other.locale.is_some() {
            self.locale = other.locale;
        }
        self
    }

    /// Encode as ordered query-string pairs (unescaped)
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.populate.is_empty() {
            params.push(("populate".to_string(), self.populate.join(",")));
        }

        for filter in &self.filters {
            params.push((filter.param_key(), filter.value.clone()));
        }

        if !self.sort.is_empty() {
            let sort = self.sort.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
            params.push(("sort".to_string(), sort));
        }

        if let Some(pagination) = &self.pagination {
            let parts = [
                ("page", pagination.page),
                ("pageSize", pagination.page_size),
                ("start", pagination.start),
                ("limit", pagination.limit),
            ];
            for (key, value) in parts {
                if let Some(value) = value {
                    params.push((format!("pagination[{}]", key), value.to_string()));
                }
            }
        }

        if !self.fields.is_empty() {
            params.push(("fields".to_string(), self.fields.join(",")));
        }

        if let Some(state) = self.publication_state {
            params.push(("publicationState".to_string(), state.as_str().to_string()));
        }

        if let Some(locale) = &self.locale {
            params.push(("locale".to_string(), locale.clone()));
        }

        params
    }

    /// Value of the first filter on `field` with `operator`, if any
    pub fn filter_value(&self, field: &str, operator: FilterOperator) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.field == field && f.operator == operator)
            .map(|f| f.value.as_str())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Nested field paths become one bracketed segment per path element
        #[test]
        fn filter_key_brackets_every_segment(segments in proptest::collection::vec("[a-zA-Z]{1,8}", 1..4)) {
            let field = segments.join(".");
            let key = FilterPredicate::new(field, FilterOperator::ContainsI, "x").param_key();
            let expected = format!("filters[{}][$containsi]", segments.join("]["));
            prop_assert_eq!(key, expected);
        }

        /// Overlaying an empty query changes nothing
        #[test]
        fn overlay_with_empty_is_identity(limit in 1u32..100, term in "[a-z]{1,10}") {
            let query = ContentQuery::defaults_for(ContentType::Video)
                .overlay(ContentQuery::title_search(&term).limit(limit));
            prop_assert_eq!(query.clone().overlay(ContentQuery::new()), query);
        }
    }
}
