//! Hand-authored substitute content
//!
//! Served whenever the content API is unreachable, failing, or (by default)
//! returns an empty list. Pure data: no I/O.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;

use crate::models::{
    Article, Category, ContentEntity, ContentRecord, ContentType, Difficulty, Media, Person, Tag,
    Tutorial, TutorialChapter, Video, VideoChapter,
};

static ARTICLES: Lazy<Vec<Article>> = Lazy::new(articles);
static TUTORIALS: Lazy<Vec<Tutorial>> = Lazy::new(tutorials);
static VIDEOS: Lazy<Vec<Video>> = Lazy::new(videos);
static CATEGORIES: Lazy<Vec<Category>> = Lazy::new(categories);
static TAGS: Lazy<Vec<Tag>> = Lazy::new(tags);

/// Source of fixed substitute records
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl FallbackProvider {
    pub fn new() -> Self {
        Self
    }

    /// Records of a content type, or the single record matching `identifier`
    pub fn lookup(&self, content_type: ContentType, identifier: Option<&str>) -> Vec<ContentRecord> {
        match content_type {
            ContentType::Article => records_of(ARTICLES.as_slice(), identifier),
            ContentType::Tutorial => records_of(TUTORIALS.as_slice(), identifier),
            ContentType::Video => records_of(VIDEOS.as_slice(), identifier),
            ContentType::Category => records_of(CATEGORIES.as_slice(), identifier),
            ContentType::Tag => records_of(TAGS.as_slice(), identifier),
        }
    }

    /// All fallback records of `T`, in presentation order
    pub fn list<T: ContentEntity>(&self) -> Vec<T> {
        self.lookup(T::CONTENT_TYPE, None)
            .into_iter()
            .filter_map(T::from_record)
            .collect()
    }

    /// The fallback record of `T` matching a document id, numeric id or slug
    pub fn find<T: ContentEntity>(&self, identifier: &str) -> Option<T> {
        self.lookup(T::CONTENT_TYPE, Some(identifier))
            .into_iter()
            .find_map(T::from_record)
    }
}

fn records_of<T: ContentEntity>(items: &[T], identifier: Option<&str>) -> Vec<ContentRecord> {
    items
        .iter()
        .filter(|item| identifier.map_or(true, |id| item.matches_identifier(id)))
        .cloned()
        .map(ContentEntity::into_record)
        .collect()
}

fn at(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).single()
}

fn category(id: i64, name: &str, slug: &str, color: &str) -> Category {
    let mut category = Category::new(id, &format!("cat-{}", id), name, slug, Some(color));
    category.created_at = at(2024, 1, 1);
    category.updated_at = at(2024, 1, 1);
    category
}

fn tag(id: i64, name: &str, slug: &str) -> Tag {
    let mut tag = Tag::new(id, &format!("tag-{}", id), name, slug);
    tag.created_at = at(2024, 1, 1);
    tag.updated_at = at(2024, 1, 1);
    tag
}

fn person(document_id: &str, name: &str, slug: &str, bio: &str) -> Person {
    Person::new(0, document_id, name, slug, bio)
}

fn image(url: &str, alt: &str) -> Option<Media> {
    Some(Media::from_url(url, Some(alt)))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn categories() -> Vec<Category> {
    vec![
        category(1, "All", "all", "#6b7280"),
        category(2, "Game Design", "game-design", "#a855f7"),
        category(3, "Programming", "programming", "#10b981"),
        category(4, "Art", "art", "#f59e0b"),
        category(5, "Marketing", "marketing", "#ef4444"),
    ]
}

fn tags() -> Vec<Tag> {
    vec![
        tag(1, "Unity", "unity"),
        tag(2, "Unreal Engine", "unreal-engine"),
        tag(3, "C#", "csharp"),
        tag(4, "2D Games", "2d-games"),
        tag(5, "Mobile", "mobile"),
    ]
}

const ENGAGEMENT_BODY: &str = "\
## Why players come back

Engagement is not an accident. The games people return to for years share a
small set of design habits: clear goals, meaningful rewards and a difficulty
curve that keeps pace with the player.

## Reward schedules

Variable rewards hold attention longer than fixed ones, but they only work
when the player trusts the system. Telegraph what can drop and make the rare
outcomes feel earned.

## Flow

Flow happens when challenge matches skill. Watch your playtest data for the
moments players stall or breeze through, and tune those sections first.

## Social hooks

Shared goals, guilds and asynchronous competition turn a solo habit into a
social one. Start small: a friends leaderboard is often enough.
";

const WORLDS_BODY: &str = "\
## Start with a question

Every memorable world answers a question for the player: who lived here, what
went wrong, what is worth protecting. Write that question down before the
first greybox.

## Environmental storytelling

Let the level tell the story. A barricaded door, an abandoned camp or a trail
of footprints gives context without a single line of dialogue.

## Density and rest

Alternate dense, detailed spaces with quiet ones. Players need room to absorb
what they just saw.
";

const BALANCE_BODY: &str = "\
## Balance is a process

No spreadsheet survives contact with players. Ship instrumentation with every
build and let the numbers tell you where the dominant strategies are.

## Counterplay

Every strong option needs an answer. If a tactic has no counter, it is not a
strategy, it is the game.

## Perceived fairness

Players forgive losing to a fair system far more readily than winning through
a broken one. Surface the rules so defeats feel like lessons.
";

fn articles() -> Vec<Article> {
    let engagement_tags = vec![tag(10, "Psychology", "psychology"), tag(11, "Player Engagement", "player-engagement")];

    vec![
        Article {
            id: 1,
            document_id: "article-1".to_string(),
            title: "Advanced Player Engagement Strategies".to_string(),
            slug: "advanced-player-engagement-strategies".to_string(),
            content: ENGAGEMENT_BODY.to_string(),
            excerpt: "Explore the principles that keep players hooked and how to apply them in your game design, from reward systems to flow state.".to_string(),
            read_time: "8 min".to_string(),
            featured: true,
            publish_date: "December 15, 2024".to_string(),
            views: "12.5K".to_string(),
            likes: "1.2K".to_string(),
            category: Some(category(2, "Game Design", "game-design", "#a855f7")),
            author: Some(person("author-1", "Sarah Chen", "sarah-chen", "Lead game designer with 10 years of experience in player psychology.")),
            tags: engagement_tags,
            featured_image: image("/uploads/player_engagement.jpg", "Players gathered around a screen"),
            created_at: at(2024, 12, 15),
            updated_at: at(2024, 12, 15),
            published_at: at(2024, 12, 15),
        },
        Article {
            id: 2,
            document_id: "article-2".to_string(),
            title: "Building Immersive Game Worlds".to_string(),
            slug: "building-immersive-game-worlds".to_string(),
            content: WORLDS_BODY.to_string(),
            excerpt: "Learn the secrets behind creating compelling game worlds that players never want to leave.".to_string(),
            read_time: "12 min".to_string(),
            featured: false,
            publish_date: "December 12, 2024".to_string(),
            views: "8.9K".to_string(),
            likes: "756".to_string(),
            category: Some(category(4, "Art", "art", "#f59e0b")),
            author: Some(person("author-2", "Marcus Rodriguez", "marcus-rodriguez", "Environment artist and world builder.")),
            tags: vec![tag(12, "World Building", "world-building"), tag(1, "Unity", "unity")],
            featured_image: image("/uploads/immersive_worlds.jpg", "A misty fantasy landscape"),
            created_at: at(2024, 12, 12),
            updated_at: at(2024, 12, 12),
            published_at: at(2024, 12, 12),
        },
        Article {
            id: 3,
            document_id: "article-3".to_string(),
            title: "The Art of Game Balance".to_string(),
            slug: "the-art-of-game-balance".to_string(),
            content: BALANCE_BODY.to_string(),
            excerpt: "Discover how to create balanced gameplay that challenges without frustrating players.".to_string(),
            read_time: "6 min".to_string(),
            featured: false,
            publish_date: "December 10, 2024".to_string(),
            views: "15.2K".to_string(),
            likes: "2.1K".to_string(),
            category: Some(category(2, "Game Design", "game-design", "#a855f7")),
            author: Some(person("author-3", "Alex Thompson", "alex-thompson", "Systems designer focused on competitive multiplayer.")),
            tags: vec![tag(13, "Game Balance", "game-balance"), tag(14, "Mechanics", "mechanics")],
            featured_image: image("/uploads/game_balance.jpg", "A set of scales over a game board"),
            created_at: at(2024, 12, 10),
            updated_at: at(2024, 12, 10),
            published_at: at(2024, 12, 10),
        },
    ]
}

fn tutorials() -> Vec<Tutorial> {
    vec![
        Tutorial {
            id: 1,
            document_id: "tutorial-1".to_string(),
            title: "Unity 2D Game Development Masterclass".to_string(),
            slug: "unity-2d-masterclass".to_string(),
            description: "Learn to create complete 2D games in Unity from scratch, from basic concepts to advanced game mechanics.".to_string(),
            content: None,
            duration: "4h 30m".to_string(),
            difficulty: Difficulty::Beginner,
            featured: true,
            publish_date: "December 18, 2024".to_string(),
            views: "15.2K".to_string(),
            likes: "1.2K".to_string(),
            rating: Some(4.8),
            total_ratings: Some(342),
            what_you_learn: strings(&[
                "Set up a Unity 2D project",
                "Implement player movement and input",
                "Build levels with tilemaps",
                "Add sound, UI and polish",
            ]),
            requirements: strings(&["A computer that runs Unity", "No prior game development experience"]),
            chapters: vec![
                TutorialChapter {
                    title: "Introduction to Unity 2D".to_string(),
                    duration: "15:30".to_string(),
                    description: "Overview of the Unity 2D environment and basic concepts.".to_string(),
                },
                TutorialChapter {
                    title: "Setting Up Your Project".to_string(),
                    duration: "12:45".to_string(),
                    description: "Project setup, importing assets and organizing your workspace.".to_string(),
                },
                TutorialChapter {
                    title: "Player Movement and Controls".to_string(),
                    duration: "22:15".to_string(),
                    description: "Smooth player movement with input handling.".to_string(),
                },
            ],
            category: Some(category(3, "Programming", "programming", "#10b981")),
            instructor: Some(person("instructor-1", "David Park", "david-park", "Indie developer and Unity certified instructor.")),
            tags: vec![tag(1, "Unity", "unity"), tag(4, "2D Games", "2d-games")],
            thumbnail: image("/uploads/unity_2d.jpg", "Unity editor with a 2D scene"),
            images: Vec::new(),
            created_at: at(2024, 12, 18),
            updated_at: at(2024, 12, 18),
            published_at: at(2024, 12, 18),
        },
        Tutorial {
            id: 2,
            document_id: "tutorial-2".to_string(),
            title: "Advanced Shader Programming in Unity".to_string(),
            slug: "advanced-shader-programming-unity".to_string(),
            description: "Master HLSL and Shader Graph to build custom lighting, dissolve effects and stylized rendering.".to_string(),
            content: None,
            duration: "6h 15m".to_string(),
            difficulty: Difficulty::Advanced,
            featured: true,
            publish_date: "December 14, 2024".to_string(),
            views: "9.8K".to_string(),
            likes: "870".to_string(),
            rating: Some(4.9),
            total_ratings: Some(156),
            what_you_learn: strings(&["Write HLSL shaders", "Build Shader Graph effects", "Profile GPU cost"]),
            requirements: strings(&["Comfortable with Unity", "Basic linear algebra"]),
            chapters: vec![
                TutorialChapter {
                    title: "The Rendering Pipeline".to_string(),
                    duration: "18:20".to_string(),
                    description: "How a frame gets drawn.".to_string(),
                },
                TutorialChapter {
                    title: "Your First Surface Shader".to_string(),
                    duration: "25:10".to_string(),
                    description: "Lighting models and surface outputs.".to_string(),
                },
            ],
            category: Some(category(4, "Art", "art", "#f59e0b")),
            instructor: Some(person("instructor-2", "Lena Ortiz", "lena-ortiz", "Technical artist specializing in real-time rendering.")),
            tags: vec![tag(1, "Unity", "unity")],
            thumbnail: image("/uploads/shader_programming.jpg", "Glowing shader effects"),
            images: Vec::new(),
            created_at: at(2024, 12, 14),
            updated_at: at(2024, 12, 14),
            published_at: at(2024, 12, 14),
        },
        Tutorial {
            id: 3,
            document_id: "tutorial-3".to_string(),
            title: "Complete C# Programming for Games".to_string(),
            slug: "complete-csharp-programming-games".to_string(),
            description: "Everything you need to know about C# to write clean, fast gameplay code.".to_string(),
            content: None,
            duration: "8h 00m".to_string(),
            difficulty: Difficulty::Intermediate,
            featured: true,
            publish_date: "December 8, 2024".to_string(),
            views: "21.4K".to_string(),
            likes: "1.9K".to_string(),
            rating: Some(4.7),
            total_ratings: Some(512),
            what_you_learn: strings(&["Object-oriented design for games", "Events and delegates", "Coroutines and async"]),
            requirements: strings(&["Basic programming knowledge"]),
            chapters: vec![TutorialChapter {
                title: "C# Fundamentals".to_string(),
                duration: "30:00".to_string(),
                description: "Types, control flow and methods.".to_string(),
            }],
            category: Some(category(3, "Programming", "programming", "#10b981")),
            instructor: Some(person("instructor-1", "David Park", "david-park", "Indie developer and Unity certified instructor.")),
            tags: vec![tag(3, "C#", "csharp"), tag(1, "Unity", "unity")],
            thumbnail: image("/uploads/csharp_games.jpg", "C# code on a dark editor"),
            images: Vec::new(),
            created_at: at(2024, 12, 8),
            updated_at: at(2024, 12, 8),
            published_at: at(2024, 12, 8),
        },
    ]
}

fn videos() -> Vec<Video> {
    let academy = person("creator-1", "GameDev Academy", "gamedev-academy", "Weekly game development walkthroughs.");

    vec![
        Video {
            id: 1,
            document_id: "video-1".to_string(),
            title: "Building Your First 3D Game in Unity - Complete Walkthrough".to_string(),
            slug: "first-3d-game-unity".to_string(),
            description: "Walk through the entire process of creating a 3D platformer in Unity from scratch.".to_string(),
            duration: "45:30".to_string(),
            views: "125.3K".to_string(),
            likes: "8.2K".to_string(),
            publish_date: "December 20, 2024".to_string(),
            featured: true,
            video_url: Some("https://www.youtube.com/embed/dQw4w9WgXcQ".to_string()),
            chapters: vec![
                VideoChapter {
                    title: "Introduction & Project Setup".to_string(),
                    time: "0:00".to_string(),
                    duration: "3:20".to_string(),
                },
                VideoChapter {
                    title: "Creating the Environment".to_string(),
                    time: "3:20".to_string(),
                    duration: "7:45".to_string(),
                },
                VideoChapter {
                    title: "Player Controller".to_string(),
                    time: "11:05".to_string(),
                    duration: "12:10".to_string(),
                },
            ],
            article: None,
            tutorial: None,
            category: Some(category(3, "Programming", "programming", "#10b981")),
            creator: Some(Person {
                subscriber_count: Some("250K".to_string()),
                ..academy.clone()
            }),
            tags: vec![tag(1, "Unity", "unity")],
            thumbnail: image("/uploads/first_3d_game.jpg", "A low-poly 3D platformer level"),
            created_at: at(2024, 12, 20),
            updated_at: at(2024, 12, 20),
            published_at: at(2024, 12, 20),
        },
        Video {
            id: 2,
            document_id: "video-2".to_string(),
            title: "Advanced Shader Effects in Unreal Engine 5".to_string(),
            slug: "advanced-shader-effects-ue5".to_string(),
            description: "Build dissolve, hologram and water materials with the UE5 material editor.".to_string(),
            duration: "32:15".to_string(),
            views: "67.8K".to_string(),
            likes: "4.1K".to_string(),
            publish_date: "December 16, 2024".to_string(),
            featured: false,
            video_url: None,
            chapters: vec![VideoChapter {
                title: "Material Editor Basics".to_string(),
                time: "0:00".to_string(),
                duration: "6:30".to_string(),
            }],
            article: None,
            tutorial: None,
            category: Some(category(4, "Art", "art", "#f59e0b")),
            creator: Some(person("creator-2", "Unreal Insights", "unreal-insights", "Deep dives into Unreal Engine.")),
            tags: vec![tag(2, "Unreal Engine", "unreal-engine")],
            thumbnail: image("/uploads/ue5_shaders.jpg", "Hologram material in Unreal Engine"),
            created_at: at(2024, 12, 16),
            updated_at: at(2024, 12, 16),
            published_at: at(2024, 12, 16),
        },
        Video {
            id: 3,
            document_id: "video-3".to_string(),
            title: "Mobile Game Monetization Strategies That Actually Work".to_string(),
            slug: "mobile-game-monetization-strategies".to_string(),
            description: "Ads, in-app purchases and subscriptions: what works on mobile and what drives players away.".to_string(),
            duration: "1:02:40".to_string(),
            views: "43.1K".to_string(),
            likes: "2.7K".to_string(),
            publish_date: "December 11, 2024".to_string(),
            featured: false,
            video_url: None,
            chapters: Vec::new(),
            article: None,
            tutorial: None,
            category: Some(category(5, "Marketing", "marketing", "#ef4444")),
            creator: Some(academy),
            tags: vec![tag(5, "Mobile", "mobile")],
            thumbnail: image("/uploads/mobile_monetization.jpg", "A phone showing a game store page"),
            created_at: at(2024, 12, 11),
            updated_at: at(2024, 12, 11),
            published_at: at(2024, 12, 11),
        },
    ]
}
