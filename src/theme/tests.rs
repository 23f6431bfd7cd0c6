//! Tests for the theme engine

use super::*;
use crate::content::Connectivity;
use std::fs;
use tempfile::TempDir;
use tera::Context as TeraContext;

/// Helper to create an override directory with the given templates and assets
fn create_overrides(templates: &[(&str, &str)], assets: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    let template_dir = temp_dir.path().join("templates");
    for (name, content) in templates {
        let path = template_dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    let static_dir = temp_dir.path().join("static");
    for (name, content) in assets {
        let path = static_dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    temp_dir
}

fn standard_vars(connectivity: Connectivity) -> StandardTemplateVars {
    StandardTemplateVars {
        site_title: "The Game Loop".to_string(),
        request_path: "/about".to_string(),
        year: 2024,
        connectivity,
    }
}

fn about_context() -> TeraContext {
    let mut context = TeraContext::new();
    context.insert("about", &crate::services::about_page());
    context
}

#[test]
fn test_embedded_templates_load() {
    let temp_dir = TempDir::new().unwrap();
    let engine = ThemeEngine::new(temp_dir.path()).unwrap();

    for name in [
        "base.html",
        "macros.html",
        "home.html",
        "list.html",
        "article.html",
        "tutorial.html",
        "video.html",
        "search.html",
        "about.html",
        "error.html",
    ] {
        assert!(engine.has_template(name), "missing {}", name);
    }
    assert!(engine.overridden().is_empty());
}

#[test]
fn test_render_with_standard_vars() {
    let temp_dir = TempDir::new().unwrap();
    let engine = ThemeEngine::new(temp_dir.path()).unwrap();

    let html = engine
        .render_with_standard_vars("about.html", &about_context(), &standard_vars(Connectivity::Live))
        .unwrap();

    assert!(html.contains("<title>About | The Game Loop</title>"));
    assert!(html.contains("&copy; 2024 The Game Loop"));
    assert!(html.contains("Sarah Chen"));
    assert!(!html.contains("Showing offline content"));
}

#[test]
fn test_degraded_banner() {
    let temp_dir = TempDir::new().unwrap();
    let engine = ThemeEngine::new(temp_dir.path()).unwrap();

    let html = engine
        .render_with_standard_vars("about.html", &about_context(), &standard_vars(Connectivity::Degraded))
        .unwrap();

    assert!(html.contains("Showing offline content"));
}

#[test]
fn test_template_override_replaces_embedded() {
    let overrides = create_overrides(
        &[(
            "about.html",
            r#"{% extends "base.html" %}{% block content %}<p>Custom about for {{ site_title }}</p>{% endblock content %}"#,
        )],
        &[],
    );
    let engine = ThemeEngine::new(overrides.path()).unwrap();

    assert_eq!(engine.overridden().to_vec(), vec!["about.html".to_string()]);
    let html = engine
        .render_with_standard_vars("about.html", &TeraContext::new(), &standard_vars(Connectivity::Live))
        .unwrap();
    assert!(html.contains("Custom about for The Game Loop"));
    assert!(!html.contains("Sarah Chen"));
}

#[test]
fn test_new_template_from_override_dir() {
    let overrides = create_overrides(&[("partials/promo.html", "<aside>{{ message }}</aside>")], &[]);
    let engine = ThemeEngine::new(overrides.path()).unwrap();

    let mut context = TeraContext::new();
    context.insert("message", "Game jam this weekend");
    let html = engine.render("partials/promo.html", &context).unwrap();
    assert_eq!(html, "<aside>Game jam this weekend</aside>");
    assert!(engine.template_names().contains(&"partials/promo.html".to_string()));
}

#[test]
fn test_missing_template_error() {
    let temp_dir = TempDir::new().unwrap();
    let engine = ThemeEngine::new(temp_dir.path()).unwrap();

    let err = engine.render("forum.html", &TeraContext::new()).unwrap_err();
    assert!(matches!(err.downcast_ref::<ThemeError>(), Some(ThemeError::NotFound(name)) if name == "forum.html"));
}

#[test]
fn test_invalid_override_fails_to_load() {
    let overrides = create_overrides(&[("about.html", "{% if %}")], &[]);
    let result = ThemeEngine::new(overrides.path());
    assert!(result.is_err());
}

#[test]
fn test_asset_lookup() {
    let overrides = create_overrides(&[], &[("site.css", "body { color: red; }"), ("img/logo.svg", "<svg/>")]);
    let engine = ThemeEngine::new(overrides.path()).unwrap();

    let css = engine.asset("site.css").unwrap();
    assert_eq!(css.data.as_ref(), b"body { color: red; }");
    assert_eq!(css.content_type, "text/css");

    let logo = engine.asset("/img/logo.svg").unwrap();
    assert_eq!(logo.content_type, "image/svg+xml");

    assert!(engine.asset("missing.js").is_none());
}

#[test]
fn test_embedded_asset_without_override() {
    let temp_dir = TempDir::new().unwrap();
    let engine = ThemeEngine::new(temp_dir.path()).unwrap();

    let css = engine.asset("site.css").unwrap();
    assert!(!css.data.is_empty());
    assert_eq!(css.content_type, "text/css");
}

#[test]
fn test_asset_path_traversal_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("secret.txt"), "hidden").unwrap();
    let overrides = temp_dir.path().join("theme");
    fs::create_dir_all(overrides.join("static")).unwrap();
    let engine = ThemeEngine::new(&overrides).unwrap();

    assert!(engine.asset("../secret.txt").is_none());
    assert!(engine.asset("%2e%2e/secret.txt").is_none());
    assert!(engine.asset("").is_none());
}

#[test]
fn test_asset_backslash_traversal_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.yml"), "strapi:\n  api_token: SECRET-TOKEN\n").unwrap();
    let overrides = temp_dir.path().join("themes");
    fs::create_dir_all(overrides.join("static")).unwrap();
    let engine = ThemeEngine::new(&overrides).unwrap();

    assert!(engine.asset("..\\..\\config.yml").is_none());
    assert!(engine.asset("..%5C..%5Cconfig.yml").is_none());
    assert!(engine.asset("img\\..\\..\\..\\config.yml").is_none());

    assert_eq!(sanitize_asset_path("img\\logo.svg"), Some("img/logo.svg".to_string()));
    assert_eq!(sanitize_asset_path("..\\secret.txt"), None);
}

#[test]
fn test_content_type_for() {
    assert_eq!(content_type_for("a/b/c.woff2"), "font/woff2");
    assert_eq!(content_type_for("logo.png"), "image/png");
    assert_eq!(content_type_for("README"), "application/octet-stream");
}
