//! Shared presentation helpers
//!
//! Every view goes through one `Formatter` for image URLs, dates, durations,
//! view counts, initials and difficulty colours.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Difficulty, ImageSize, Media, DEFAULT_CATEGORY_COLOR};

/// Matches `4h 30m`, `45m`, `2 hours`, `8 min`, `90s`
static UNIT_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(h|hr|hrs|hour|hours|m|min|mins|minute|minutes|s|sec|secs|second|seconds)\b")
        .expect("valid duration regex")
});

/// Presentation formatting bound to a CMS base URL
#[derive(Debug, Clone)]
pub struct Formatter {
    media_base: String,
}

impl Formatter {
    /// `media_base` is the CMS origin that relative upload paths hang off
    pub fn new(media_base: &str) -> Self {
        Self {
            media_base: media_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn media_base(&self) -> &str {
        &self.media_base
    }

    /// Absolute URL for a (possibly relative) CMS asset path
    pub fn resolve_url(&self, url: &str) -> String {
        let url = url.trim();
        if url.is_empty()
            || url.starts_with("http://")
            || url.starts_with("https://")
            || url.starts_with("//")
            || url.starts_with("data:")
        {
            return url.to_string();
        }
        if url.starts_with('/') {
            format!("{}{}", self.media_base, url)
        } else {
            format!("{}/{}", self.media_base, url)
        }
    }

    /// Image URL at the preferred size, falling back to the original
    pub fn image_url(&self, media: Option<&Media>, size: ImageSize) -> Option<String> {
        let url = media?.url_for(size);
        if url.trim().is_empty() {
            return None;
        }
        Some(self.resolve_url(url))
    }

    /// "December 15, 2024"; display strings the CMS already formatted pass through
    pub fn long_date(&self, value: &str) -> String {
        match parse_date(value) {
            Some(date) => date.format("%B %-d, %Y").to_string(),
            None => value.trim().to_string(),
        }
    }

    /// "Dec 15"
    pub fn short_date(&self, value: &str) -> String {
        match parse_date(value) {
            Some(date) => date.format("%b %-d").to_string(),
            None => value.trim().to_string(),
        }
    }

    /// Display date for a record: its publish date, else its publication timestamp
    pub fn record_date(&self, publish_date: &str, published_at: Option<&DateTime<Utc>>) -> String {
        if !publish_date.trim().is_empty() {
            return self.long_date(publish_date);
        }
        published_at
            .map(|at| at.format("%B %-d, %Y").to_string())
            .unwrap_or_default()
    }

    /// Seconds in `mm:ss`, `h:mm:ss`, `4h 30m` or `8 min`
    pub fn duration_seconds(&self, value: &str) -> Option<u32> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if value.contains(':') {
            let mut total: u32 = 0;
            let parts: Vec<&str> = value.split(':').collect();
            if parts.len() > 3 {
                return None;
            }
            for part in parts {
                let part: u32 = part.trim().parse().ok()?;
                total = total.checked_mul(60)?.checked_add(part)?;
            }
            return Some(total);
        }

        if let Ok(minutes) = value.parse::<u32>() {
            return minutes.checked_mul(60);
        }

        let mut total = 0f64;
        let mut matched = false;
        for caps in UNIT_DURATION.captures_iter(value) {
            matched = true;
            let amount: f64 = caps[1].parse().ok()?;
            let unit = caps[2].to_lowercase();
            let scale = match unit.chars().next() {
                Some('h') => 3600.0,
                Some('m') => 60.0,
                _ => 1.0,
            };
            total += amount * scale;
        }
        matched.then(|| total.round() as u32)
    }

    /// `45:30`, `1:02:40`
    pub fn duration_label(&self, seconds: u32) -> String {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, secs)
        } else {
            format!("{}:{:02}", minutes, secs)
        }
    }

    /// Compact view count: raw numbers become `12.5K` / `1.2M`, labels pass through
    pub fn views_label(&self, value: &str) -> String {
        let value = value.trim();
        let Ok(count) = value.replace(',', "").parse::<u64>() else {
            return value.to_string();
        };
        match count {
            0..=999 => count.to_string(),
            1_000..=999_999 => compact(count as f64 / 1_000.0, "K"),
            _ => compact(count as f64 / 1_000_000.0, "M"),
        }
    }

    /// First letter of each word, uppercased ("GameDev Academy" -> "GA")
    pub fn initials(&self, name: &str) -> String {
        name.split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn difficulty_color(&self, difficulty: Difficulty) -> &'static str {
        match difficulty {
            Difficulty::Beginner => "#10b981",
            Difficulty::Intermediate => "#f59e0b",
            Difficulty::Advanced => "#ef4444",
        }
    }

    /// Colour for a free-form difficulty label; unknown labels get the neutral grey
    pub fn difficulty_label_color(&self, label: &str) -> &'static str {
        label
            .parse::<Difficulty>()
            .map(|d| self.difficulty_color(d))
            .unwrap_or(DEFAULT_CATEGORY_COLOR)
    }

    /// Percentage of `done` out of `total`, rounded
    pub fn percentage(&self, done: usize, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        ((done as f64 / total as f64) * 100.0).round() as u32
    }
}

fn compact(value: f64, suffix: &str) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}{}", rounded as u64, suffix)
    } else {
        format!("{:.1}{}", rounded, suffix)
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
