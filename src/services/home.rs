//! Home and about pages

use serde::Serialize;

use super::listing::worst;
use crate::content::{Connectivity, ContentClient};
use crate::models::{Article, Tutorial, Video};

/// Data behind the home page
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub featured_article: Option<Article>,
    pub featured_tutorials: Vec<Tutorial>,
    pub featured_video: Option<Video>,
    /// Any section is showing substitute content
    pub fallback: bool,
    pub connectivity: Connectivity,
}

/// Loads the home page's featured sections concurrently
#[derive(Clone)]
pub struct HomeController {
    client: ContentClient,
}

impl HomeController {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }

    pub async fn load(&self, connectivity: Connectivity) -> HomePage {
        let (articles, tutorials, videos) = tokio::join!(
            self.client.featured_articles(connectivity),
            self.client.featured_tutorials(connectivity),
            self.client.featured_videos(connectivity),
        );

        let fallback = articles.origin.is_fallback() || tutorials.origin.is_fallback() || videos.origin.is_fallback();
        let connectivity = worst(
            articles.connectivity,
            worst(tutorials.connectivity, videos.connectivity),
        );

        HomePage {
            featured_article: articles.data.into_iter().next(),
            featured_tutorials: tutorials.data.into_iter().take(3).collect(),
            featured_video: videos.data.into_iter().next(),
            fallback,
            connectivity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub bio: &'static str,
    pub expertise: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
}

/// Static about page content
#[derive(Debug, Clone, Serialize)]
pub struct AboutPage {
    pub team: &'static [TeamMember],
    pub stats: &'static [Stat],
}

const TEAM: &[TeamMember] = &[
    TeamMember {
        name: "Sarah Chen",
        role: "Lead Game Designer",
        bio: "10+ years in AAA game development, focused on systems and player psychology.",
        expertise: &["Game Design", "Player Psychology", "Systems Design"],
    },
    TeamMember {
        name: "Mike Rodriguez",
        role: "Senior Unity Developer",
        bio: "Unity developer with 8 years of experience shipping mobile and PC games.",
        expertise: &["Unity 3D", "C# Programming", "Mobile Optimization"],
    },
    TeamMember {
        name: "Emma Wilson",
        role: "Technical Artist",
        bio: "Works between art and code, specializing in shaders and rendering pipelines.",
        expertise: &["Shaders", "VFX", "Pipeline Development"],
    },
    TeamMember {
        name: "David Kim",
        role: "Community Manager",
        bio: "Has been building the game development community for more than five years.",
        expertise: &["Community Building", "Content Strategy", "Developer Relations"],
    },
];

const STATS: &[Stat] = &[
    Stat { label: "Articles Published", value: "150+" },
    Stat { label: "Video Tutorials", value: "80+" },
    Stat { label: "Community Members", value: "25K+" },
    Stat { label: "Years of Experience", value: "5+" },
];

pub fn about_page() -> AboutPage {
    AboutPage { team: TEAM, stats: STATS }
}
