//! HTML pages
//!
//! Every handler reads the shared connectivity, passes it to its
//! controller and records whatever connectivity came back before rendering.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tera::Context as TeraContext;

use crate::api::middleware::AppState;
use crate::models::{Article, ContentType, Difficulty, Tutorial, Video, ALL_CATEGORIES};
use crate::services::{
    about_page, cards, decide, DetailOutcome, DetailPage, ListFilter, SearchAction, SearchMode, SearchState, ToCard,
    TutorialFacts, VideoFacts,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/search", get(search))
        .route("/articles", get(list_articles))
        .route("/articles/", get(redirect_to_list::<Article>))
        .route("/articles/{id}", get(article_detail))
        .route("/tutorials", get(list_tutorials))
        .route("/tutorials/", get(redirect_to_list::<Tutorial>))
        .route("/tutorials/{id}", get(tutorial_detail))
        .route("/videos", get(list_videos))
        .route("/videos/", get(redirect_to_list::<Video>))
        .route("/videos/{id}", get(video_detail))
}

/// Render a page template, or a bare 500 when the template fails
fn render(state: &AppState, template: &str, request_path: &str, context: &TeraContext) -> Response {
    render_with_status(state, StatusCode::OK, template, request_path, context)
}

fn render_with_status(
    state: &AppState,
    status: StatusCode,
    template: &str,
    request_path: &str,
    context: &TeraContext,
) -> Response {
    let vars = state.standard_vars(request_path);
    match state.theme_engine.render_with_standard_vars(template, context, &vars) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {:#}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Internal Server Error</h1>".to_string())).into_response()
        }
    }
}

// ============================================================================
// Home and About
// ============================================================================

async fn home(State(state): State<AppState>) -> Response {
    let page = state.home().load(state.connectivity.get()).await;
    state.connectivity.record(page.connectivity);

    let formatter = &state.formatter;
    let mut context = TeraContext::new();
    context.insert("featured_article", &page.featured_article.map(|a| a.card(formatter)));
    context.insert("featured_tutorials", &cards(&page.featured_tutorials, formatter));
    context.insert("featured_video", &page.featured_video.map(|v| v.card(formatter)));
    context.insert("fallback", &page.fallback);
    render(&state, "home.html", "/", &context)
}

async fn about(State(state): State<AppState>) -> Response {
    let mut context = TeraContext::new();
    context.insert("about", &about_page());
    render(&state, "about.html", "/about", &context)
}

// ============================================================================
// List pages
// ============================================================================

/// A filter chip with the link that selects it
#[derive(Debug, Serialize)]
struct Chip {
    name: String,
    href: String,
    active: bool,
}

/// Query string for a list page; empty parts are left out
fn filter_href(list_path: &str, filter: &ListFilter) -> String {
    let mut params = Vec::new();
    if let Some(category) = filter.active_category() {
        params.push(format!("category={}", urlencoding::encode(category)));
    }
    if let Some(difficulty) = filter.active_difficulty() {
        params.push(format!("difficulty={}", difficulty));
    }
    if let Some(keyword) = filter.keyword() {
        params.push(format!("q={}", urlencoding::encode(keyword)));
    }
    if params.is_empty() {
        list_path.to_string()
    } else {
        format!("{}?{}", list_path, params.join("&"))
    }
}

async fn list_page<T: ToCard>(state: AppState, filter: ListFilter) -> Response {
    let content_type = T::CONTENT_TYPE;
    let list_path = content_type.list_path();

    let page = state.lists().load::<T>(state.connectivity.get(), filter).await;
    state.connectivity.record(page.connectivity);
    if page.origin.is_fallback() {
        tracing::debug!(%content_type, origin = ?page.origin, "Rendering list with fallback content");
    }

    let selected = page.filter.active_category().map(str::to_lowercase);
    let categories: Vec<Chip> = page
        .categories
        .iter()
        .map(|category| {
            let mut next = page.filter.clone();
            next.select_category(&category.name);
            let active = match &selected {
                Some(selected) => category.name.to_lowercase() == *selected,
                None => category.is_all(),
            };
            Chip {
                name: category.name.clone(),
                href: filter_href(list_path, &next),
                active,
            }
        })
        .collect();

    let difficulties: Vec<Chip> = if content_type == ContentType::Tutorial {
        let current = page.filter.active_difficulty();
        std::iter::once(ALL_CATEGORIES)
            .chain(Difficulty::ALL.iter().map(|d| d.as_str()))
            .map(|name| {
                let mut next = page.filter.clone();
                next.select_difficulty(name);
                let active = match current {
                    Some(current) => current.as_str() == name,
                    None => name == ALL_CATEGORIES,
                };
                Chip {
                    name: name.to_string(),
                    href: filter_href(list_path, &next),
                    active,
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut context = TeraContext::new();
    context.insert("heading", content_type.label());
    context.insert("list_path", list_path);
    context.insert("cards", &cards(&page.items, &state.formatter));
    context.insert("total", &page.total);
    context.insert("categories", &categories);
    context.insert("difficulties", &difficulties);
    context.insert("keyword", page.filter.keyword().unwrap_or(""));
    context.insert("selected_category", &page.filter.active_category());
    context.insert("selected_difficulty", &page.filter.active_difficulty().map(|d| d.as_str()));
    render(&state, "list.html", list_path, &context)
}

async fn list_articles(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Response {
    list_page::<Article>(state, filter).await
}

async fn list_tutorials(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Response {
    list_page::<Tutorial>(state, filter).await
}

async fn list_videos(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Response {
    list_page::<Video>(state, filter).await
}

/// Detail route without an identifier
async fn redirect_to_list<T: ToCard>() -> Redirect {
    Redirect::to(T::CONTENT_TYPE.list_path())
}

// ============================================================================
// Detail pages
// ============================================================================

/// Load a detail page, turning redirects and failures into responses
async fn load_detail<T: ToCard>(state: &AppState, id: &str) -> Result<DetailPage<T>, Response> {
    let (outcome, connectivity) = state.details().load::<T>(state.connectivity.get(), id).await;
    state.connectivity.record(connectivity);

    match outcome {
        DetailOutcome::Render(page) => Ok(page),
        DetailOutcome::Redirect(list_path) => Err(Redirect::to(list_path).into_response()),
        DetailOutcome::Unavailable(message) => {
            tracing::warn!(content_type = %T::CONTENT_TYPE, id, "Detail unavailable: {}", message);
            Err(unavailable(state, T::CONTENT_TYPE, &message))
        }
    }
}

fn unavailable(state: &AppState, content_type: ContentType, message: &str) -> Response {
    let mut context = TeraContext::new();
    context.insert("heading", "Content unavailable");
    context.insert("message", message);
    context.insert("back_href", content_type.list_path());
    context.insert("back_label", &format!("Back to {}", content_type.label().to_lowercase()));
    render_with_status(state, StatusCode::BAD_GATEWAY, "error.html", content_type.list_path(), &context)
}

fn category_context<T: ToCard>(context: &mut TeraContext, state: &AppState, record: &T) {
    let card = record.card(&state.formatter);
    context.insert("category", &card.category);
    context.insert("category_color", &card.category_color);
    context.insert("date", &card.date);
    context.insert("views", &card.views);
    context.insert("image_url", &card.image_url);
    context.insert("image_alt", &card.image_alt);
}

async fn article_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let page = match load_detail::<Article>(&state, &id).await {
        Ok(page) => page,
        Err(response) => return response,
    };
    let article = &page.record;

    let mut context = TeraContext::new();
    category_context(&mut context, &state, article);
    context.insert("article", article);
    context.insert("body_html", &state.renderer.render(&article.content));
    context.insert("author", &article.author);
    context.insert(
        "author_initials",
        &article.author.as_ref().map(|p| state.formatter.initials(&p.name)),
    );
    context.insert("tags", &article.tag_names());
    context.insert("related", &cards(&page.related, &state.formatter));
    render(&state, "article.html", &ContentType::Article.detail_path(&id), &context)
}

async fn tutorial_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let page = match load_detail::<Tutorial>(&state, &id).await {
        Ok(page) => page,
        Err(response) => return response,
    };
    let tutorial = &page.record;

    let mut context = TeraContext::new();
    category_context(&mut context, &state, tutorial);
    context.insert("tutorial", tutorial);
    context.insert("facts", &TutorialFacts::new(tutorial, &state.formatter));
    context.insert(
        "body_html",
        &tutorial.content.as_deref().map(|content| state.renderer.render(content)),
    );
    context.insert("instructor", &tutorial.instructor);
    context.insert("related", &cards(&page.related, &state.formatter));
    render(&state, "tutorial.html", &ContentType::Tutorial.detail_path(&id), &context)
}

#[derive(Debug, Serialize)]
struct ChapterView<'a> {
    title: &'a str,
    time: &'a str,
    offset: u32,
    duration: &'a str,
}

#[derive(Debug, Serialize)]
struct LinkedView {
    kind: &'static str,
    href: String,
    title: String,
}

async fn video_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let page = match load_detail::<Video>(&state, &id).await {
        Ok(page) => page,
        Err(response) => return response,
    };
    let video = &page.record;
    let facts = VideoFacts::new(video, &state.formatter);

    let chapters: Vec<ChapterView> = video
        .chapters
        .iter()
        .zip(&facts.chapter_offsets)
        .map(|(chapter, offset)| ChapterView {
            title: &chapter.title,
            time: &chapter.time,
            offset: *offset,
            duration: &chapter.duration,
        })
        .collect();

    let linked = video.linked().map(|(content_type, linked)| LinkedView {
        kind: match content_type {
            ContentType::Tutorial => "tutorial",
            _ => "article",
        },
        href: content_type.detail_path(&linked.document_id),
        title: linked.title.clone().unwrap_or_else(|| linked.document_id.clone()),
    });

    let mut context = TeraContext::new();
    category_context(&mut context, &state, video);
    context.insert("video", video);
    context.insert("duration_label", &state.formatter.duration_label(facts.duration_seconds));
    context.insert("body_html", &state.renderer.render(&video.description));
    context.insert("creator", &video.creator);
    context.insert("chapters", &chapters);
    context.insert("linked", &linked);
    context.insert("facts", &facts);
    context.insert("related", &cards(&page.related, &state.formatter));
    render(&state, "video.html", &ContentType::Video.detail_path(&id), &context)
}

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    mode: SearchMode,
}

#[derive(Debug, Serialize)]
struct PanelView {
    label: &'static str,
    cards: Vec<crate::services::Card>,
}

async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let mut search = SearchState::default();

    if let SearchAction::Run(q) = decide(query.mode, &query.q, state.config.site.search_min_chars) {
        state.search().run(&mut search, state.connectivity.get(), &q).await;
        state.connectivity.record(search.connectivity);
    }

    let formatter = &state.formatter;
    let panels = vec![
        PanelView {
            label: ContentType::Article.label(),
            cards: search.articles.as_deref().map(|items| cards(items, formatter)).unwrap_or_default(),
        },
        PanelView {
            label: ContentType::Tutorial.label(),
            cards: search.tutorials.as_deref().map(|items| cards(items, formatter)).unwrap_or_default(),
        },
        PanelView {
            label: ContentType::Video.label(),
            cards: search.videos.as_deref().map(|items| cards(items, formatter)).unwrap_or_default(),
        },
    ];

    let mut context = TeraContext::new();
    context.insert("query", query.q.trim());
    context.insert("has_searched", &search.has_searched);
    context.insert("total", &search.total_results());
    context.insert("panels", &panels);
    context.insert("suggestions", &crate::services::search::SUGGESTIONS);
    render(&state, "search.html", "/search", &context)
}
