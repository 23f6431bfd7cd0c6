//! Theme engine
//!
//! This module provides template rendering using Tera.
//! Features:
//! - Default templates and assets embedded in the binary
//! - Per-file overrides from a theme directory on disk
//! - Standard template variables injected into every page

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use serde::Serialize;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tera::{Context as TeraContext, Tera};

use crate::content::Connectivity;

mod error;

pub use error::ThemeError;

/// Embedded default templates
#[derive(RustEmbed)]
#[folder = "themes/default/templates/"]
#[include = "*.html"]
struct DefaultTemplates;

/// Embedded default static assets
#[derive(RustEmbed)]
#[folder = "themes/default/static/"]
#[include = "*"]
struct DefaultAssets;

/// Variables every page template receives
#[derive(Debug, Clone, Serialize)]
pub struct StandardTemplateVars {
    pub site_title: String,
    pub request_path: String,
    pub year: i32,
    pub connectivity: Connectivity,
}

/// A static asset ready to serve
#[derive(Debug, Clone)]
pub struct Asset {
    pub data: Cow<'static, [u8]>,
    pub content_type: &'static str,
}

/// Theme engine for rendering templates
pub struct ThemeEngine {
    /// Tera template engine instance
    tera: Tera,
    /// Directory holding `templates/` and `static/` overrides
    override_path: PathBuf,
    /// Names of templates replaced from disk
    overridden: Vec<String>,
}

impl ThemeEngine {
    /// Create a theme engine from the embedded templates plus any overrides
    /// found under `override_path/templates`
    pub fn new(override_path: &Path) -> Result<Self> {
        let mut templates = embedded_templates()?;
        let mut overridden = Vec::new();

        let template_dir = override_path.join("templates");
        if template_dir.is_dir() {
            let mut from_disk = Vec::new();
            collect_templates_from_dir(&template_dir, &template_dir, &mut from_disk)?;
            for (name, content) in from_disk {
                tracing::info!("Using template override: {}", name);
                templates.retain(|(existing, _)| existing != &name);
                overridden.push(name.clone());
                templates.push((name, content));
            }
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ThemeError::TemplateError(format!("Failed to load templates: {}", describe(&e))))?;

        Ok(Self {
            tera,
            override_path: override_path.to_path_buf(),
            overridden,
        })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        if !self.has_template(template) {
            return Err(ThemeError::NotFound(template.to_string()).into());
        }
        self.tera
            .render(template, context)
            .map_err(|e| ThemeError::TemplateError(format!("Failed to render '{}': {}", template, describe(&e))).into())
    }

    /// Render a template with standard variables added
    pub fn render_with_standard_vars(
        &self,
        template: &str,
        context: &TeraContext,
        standard_vars: &StandardTemplateVars,
    ) -> Result<String> {
        let mut full_context = context.clone();
        full_context.insert("site_title", &standard_vars.site_title);
        full_context.insert("request_path", &standard_vars.request_path);
        full_context.insert("year", &standard_vars.year);
        full_context.insert("degraded", &standard_vars.connectivity.is_degraded());
        self.render(template, &full_context)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }

    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tera.get_template_names().map(str::to_string).collect();
        names.sort();
        names
    }

    /// Templates replaced from the override directory
    pub fn overridden(&self) -> &[String] {
        &self.overridden
    }

    /// Look up a static asset, preferring the override directory
    pub fn asset(&self, path: &str) -> Option<Asset> {
        let path = sanitize_asset_path(path)?;

        let static_dir = self.override_path.join("static");
        let on_disk = static_dir.join(&path);
        if on_disk.is_file() && within(&static_dir, &on_disk) {
            match fs::read(&on_disk) {
                Ok(data) => {
                    return Some(Asset {
                        data: Cow::Owned(data),
                        content_type: content_type_for(&path),
                    })
                }
                Err(e) => tracing::warn!("Failed to read asset override {:?}: {}", on_disk, e),
            }
        }

        DefaultAssets::get(&path).map(|file| Asset {
            data: file.data,
            content_type: content_type_for(&path),
        })
    }
}

fn embedded_templates() -> Result<Vec<(String, String)>> {
    let mut templates = Vec::new();
    for name in DefaultTemplates::iter() {
        let file = DefaultTemplates::get(&name)
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
        let content = String::from_utf8(file.data.into_owned())
            .with_context(|| format!("Embedded template {} is not UTF-8", name))?;
        templates.push((name.to_string(), content));
    }
    Ok(templates)
}

/// Collect templates from a directory
fn collect_templates_from_dir(base_path: &Path, current_path: &Path, templates: &mut Vec<(String, String)>) -> Result<()> {
    for entry in fs::read_dir(current_path).map_err(ThemeError::IoError)? {
        let path = entry.map_err(ThemeError::IoError)?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().map_or(false, |ext| ext == "html") {
            let relative_path = path
                .strip_prefix(base_path)
                .map_err(|_| ThemeError::TemplateError("Failed to get relative path".to_string()))?;
            let template_name = relative_path.to_string_lossy().replace('\\', "/");
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;
            templates.push((template_name, content));
        }
    }
    Ok(())
}

/// Relative asset path with no parent or root components
fn sanitize_asset_path(path: &str) -> Option<String> {
    let decoded = urlencoding::decode(path).ok()?;
    let normalized = decoded.replace('\\', "/");
    let trimmed = normalized.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let safe = Path::new(trimmed)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    safe.then(|| trimmed.to_string())
}

/// Whether `path` resolves to a location inside `dir` once symlinks are followed
fn within(dir: &Path, path: &Path) -> bool {
    match (dir.canonicalize(), path.canonicalize()) {
        (Ok(dir), Ok(path)) => path.starts_with(dir),
        _ => false,
    }
}

fn describe(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        message.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    message
}

pub fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "webp" => "image/webp",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests;
