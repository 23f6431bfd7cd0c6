//! Media model
//!
//! Uploaded images as described by the CMS upload plugin. URLs are usually
//! relative to the CMS origin; `services::format::Formatter` resolves them.

use serde::{Deserialize, Serialize};

/// An uploaded image with optional resized variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub formats: Option<MediaFormats>,
    pub url: String,
}

/// Resized variants generated by the CMS
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MediaFormats {
    #[serde(default)]
    pub thumbnail: Option<MediaFormat>,
    #[serde(default)]
    pub small: Option<MediaFormat>,
    #[serde(default)]
    pub medium: Option<MediaFormat>,
    #[serde(default)]
    pub large: Option<MediaFormat>,
}

/// One resized variant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaFormat {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Requested image size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Thumbnail,
    Small,
    Medium,
    Large,
    Original,
}

impl Media {
    /// Create a media entry pointing at a single URL
    pub fn from_url(url: &str, alternative_text: Option<&str>) -> Self {
        Self {
            url: url.to_string(),
            alternative_text: alternative_text.map(str::to_string),
            ..Self::default()
        }
    }

    /// URL of the requested size, stepping up to larger variants and finally the original
    pub fn url_for(&self, size: ImageSize) -> &str {
        let Some(formats) = &self.formats else {
            return &self.url;
        };

        let ladder: Vec<&Option<MediaFormat>> = match size {
            ImageSize::Thumbnail => vec![&formats.thumbnail, &formats.small, &formats.medium, &formats.large],
            ImageSize::Small => vec![&formats.small, &formats.medium, &formats.large],
            ImageSize::Medium => vec![&formats.medium, &formats.large],
            ImageSize::Large => vec![&formats.large],
            ImageSize::Original => Vec::new(),
        };

        ladder
            .iter()
            .find_map(|format| Option::as_ref(*format))
            .map(|format| format.url.as_str())
            .unwrap_or(&self.url)
    }

    /// Alternative text, falling back to the file name
    pub fn alt(&self) -> &str {
        self.alternative_text
            .as_deref()
            .filter(|alt| !alt.is_empty())
            .unwrap_or(&self.name)
    }
}
