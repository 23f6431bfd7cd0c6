//! Card view models shared by the home, list, search and related sections

use serde::Serialize;

use super::format::Formatter;
use super::listing::Listable;
use crate::models::{Article, Category, ContentEntity, ImageSize, Tutorial, Video, DEFAULT_CATEGORY_COLOR};

/// Everything a template needs to draw one content card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub href: String,
    pub title: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub category: Option<String>,
    pub category_color: String,
    pub difficulty: Option<String>,
    pub difficulty_color: Option<&'static str>,
    /// Author, instructor or creator
    pub byline: Option<String>,
    pub date: Option<String>,
    /// Read time or duration
    pub length: Option<String>,
    pub views: Option<String>,
}

/// Builds a `Card` for a record
pub trait ToCard: Listable {
    fn card(&self, formatter: &Formatter) -> Card;
}

impl ToCard for Article {
    fn card(&self, formatter: &Formatter) -> Card {
        let mut card = base_card(self, self.category.as_ref());
        card.image_url = formatter.image_url(self.featured_image.as_ref(), ImageSize::Small);
        card.image_alt = alt_text(self.featured_image.as_ref().map(|m| m.alt()), &self.title);
        card.byline = self.author.as_ref().map(|p| p.name.clone());
        card.date = non_empty(formatter.record_date(&self.publish_date, self.published_at.as_ref()));
        card.length = non_empty(self.read_time.clone());
        card.views = non_empty(formatter.views_label(&self.views));
        card
    }
}

impl ToCard for Tutorial {
    fn card(&self, formatter: &Formatter) -> Card {
        let mut card = base_card(self, self.category.as_ref());
        card.image_url = formatter.image_url(self.cover(), ImageSize::Small);
        card.image_alt = alt_text(self.cover().map(|m| m.alt()), &self.title);
        card.difficulty = Some(self.difficulty.to_string());
        card.difficulty_color = Some(formatter.difficulty_color(self.difficulty));
        card.byline = self.instructor.as_ref().map(|p| p.name.clone());
        card.date = non_empty(formatter.record_date(&self.publish_date, self.published_at.as_ref()));
        card.length = non_empty(self.duration.clone());
        card.views = non_empty(formatter.views_label(&self.views));
        card
    }
}

impl ToCard for Video {
    fn card(&self, formatter: &Formatter) -> Card {
        let mut card = base_card(self, self.category.as_ref());
        card.image_url = formatter.image_url(self.thumbnail.as_ref(), ImageSize::Small);
        card.image_alt = alt_text(self.thumbnail.as_ref().map(|m| m.alt()), &self.title);
        card.byline = self.creator.as_ref().map(|p| p.name.clone());
        card.date = non_empty(formatter.record_date(&self.publish_date, self.published_at.as_ref()));
        card.length = formatter
            .duration_seconds(&self.duration)
            .map(|seconds| formatter.duration_label(seconds))
            .or_else(|| non_empty(self.duration.clone()));
        card.views = non_empty(formatter.views_label(&self.views));
        card
    }
}

pub fn cards<T: ToCard>(items: &[T], formatter: &Formatter) -> Vec<Card> {
    items.iter().map(|item| item.card(formatter)).collect()
}

fn base_card<T: Listable>(item: &T, category: Option<&Category>) -> Card {
    let summary = clip_summary(item.summary());
    Card {
        href: T::CONTENT_TYPE.detail_path(item.document_id()),
        title: item.title().to_string(),
        summary,
        image_url: None,
        image_alt: String::new(),
        category: category.map(|c| c.name.clone()),
        category_color: category
            .map(|c| c.display_color().to_string())
            .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
        difficulty: None,
        difficulty_color: None,
        byline: None,
        date: None,
        length: None,
        views: None,
    }
}

const SUMMARY_CHARS: usize = 160;

fn clip_summary(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= SUMMARY_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(SUMMARY_CHARS).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > SUMMARY_CHARS / 2 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end())
}

fn alt_text(alt: Option<&str>, title: &str) -> String {
    alt.filter(|a| !a.is_empty()).unwrap_or(title).to_string()
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FallbackProvider;

    fn formatter() -> Formatter {
        Formatter::new("http://cms.local")
    }

    #[test]
    fn test_tutorial_card() {
        let tutorial = FallbackProvider.find::<Tutorial>("tutorial-1").unwrap();
        let card = tutorial.card(&formatter());

        assert_eq!(card.href, "/tutorials/tutorial-1");
        assert_eq!(card.difficulty.as_deref(), Some("Beginner"));
        assert_eq!(card.difficulty_color, Some("#10b981"));
        assert_eq!(card.byline.as_deref(), Some("David Park"));
        assert_eq!(card.length.as_deref(), Some("4h 30m"));
        assert_eq!(card.category.as_deref(), Some("Programming"));
    }

    #[test]
    fn test_video_card_uses_duration_label() {
        let video = FallbackProvider.find::<Video>("video-1").unwrap();
        let card = video.card(&formatter());

        assert_eq!(card.href, "/videos/video-1");
        assert_eq!(card.length.as_deref(), Some("45:30"));
        assert_eq!(card.byline.as_deref(), Some("GameDev Academy"));
    }

    #[test]
    fn test_long_summary_is_shortened() {
        let long = "word ".repeat(80);
        let summary = clip_summary(&long);
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= SUMMARY_CHARS + 3);
    }

    #[test]
    fn test_missing_category_uses_default_color() {
        let mut article = FallbackProvider.find::<Article>("article-1").unwrap();
        article.category = None;
        let card = article.card(&formatter());
        assert_eq!(card.category, None);
        assert_eq!(card.category_color, DEFAULT_CATEGORY_COLOR);
    }
}
