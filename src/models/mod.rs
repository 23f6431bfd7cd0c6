//! Data models
//!
//! Read-only content records served by the CMS:
//! - Articles, tutorials and videos (browsable content)
//! - Categories and tags
//! - Supporting types (people, media)
//!
//! The CMS owns every invariant; records are validated only enough to be
//! rendered (see `ContentEntity::validate`).

mod article;
mod category;
pub mod content;
mod media;
mod person;
mod tag;
mod tutorial;
mod video;

pub use article::Article;
pub use category::{Category, ALL_CATEGORIES, DEFAULT_CATEGORY_COLOR};
pub use content::{ContentEntity, ContentRecord, ContentType, UnknownContentType, ValidationError};
pub use media::{ImageSize, Media, MediaFormat, MediaFormats};
pub use person::Person;
pub use tag::Tag;
pub use tutorial::{Difficulty, Tutorial, TutorialChapter};
pub use video::{LinkedContent, Video, VideoChapter};
