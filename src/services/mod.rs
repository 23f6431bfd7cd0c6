//! Services layer - view controllers and presentation helpers
//!
//! Controllers load content through the content client, apply local
//! filtering and return plain view data for the templates and JSON API.

pub mod cards;
pub mod detail;
pub mod format;
pub mod home;
pub mod listing;
pub mod markdown;
pub mod search;

pub use cards::{cards, Card, ToCard};
pub use detail::{DetailController, DetailLoad, DetailOutcome, DetailPage, DetailState, TutorialFacts, VideoFacts};
pub use format::Formatter;
pub use home::{about_page, AboutPage, HomeController, HomePage};
pub use listing::{ListController, ListFilter, ListPage, Listable};
pub use markdown::RichTextRenderer;
pub use search::{decide, PanelResults, SearchAction, SearchController, SearchMode, SearchPanel, SearchState};
