//! Theme engine with Tera templates and suggestion resolution.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use tera::Tera;
use tracing::debug;

use crate::models::{Category, Post};

/// Site name shown in page chrome.
pub const SITE_NAME: &str = "Agora";

/// Templates compiled into the binary. A template directory may override any
/// of them.
const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    ("page.html", include_str!("../../templates/page.html")),
    ("post.html", include_str!("../../templates/post.html")),
    ("message.html", include_str!("../../templates/message.html")),
];

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
    /// Cache mapping suggestion lists to resolved template names.
    suggestion_cache: DashMap<String, String>,
}

impl ThemeEngine {
    /// Create a theme engine, loading overrides from `template_dir` when
    /// given. Built-in templates fill in whatever the directory lacks.
    pub fn new(template_dir: Option<&Path>) -> Result<Self> {
        let mut tera = match template_dir {
            Some(dir) => {
                let pattern = dir.join("**/*.html");
                let pattern_str = pattern
                    .to_str()
                    .context("invalid template directory path")?;
                Tera::new(pattern_str).context("failed to initialize Tera templates")?
            }
            None => Tera::default(),
        };

        let overridden: Vec<String> = tera.get_template_names().map(str::to_string).collect();
        let builtins: Vec<(&str, &str)> = BUILTIN_TEMPLATES
            .iter()
            .filter(|(name, _)| !overridden.iter().any(|o| o == name))
            .copied()
            .collect();
        tera.add_raw_templates(builtins)
            .context("failed to load built-in templates")?;

        // Register custom filters
        Self::register_filters(&mut tera);

        debug!(
            count = tera.get_template_names().count(),
            overrides = overridden.len(),
            "loaded templates"
        );

        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Create a theme engine with only the built-in templates.
    pub fn with_defaults() -> Result<Self> {
        Self::new(None)
    }

    /// Register custom Tera filters.
    fn register_filters(tera: &mut Tera) {
        // Backend dates as "October 17, 2026 14:30"
        tera.register_filter(
            "format_date",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let formatted = match value {
                    tera::Value::String(s) => format_date(s),
                    tera::Value::Number(n) => n
                        .as_i64()
                        .and_then(|ts| DateTime::from_timestamp(ts, 0))
                        .map(|dt| dt.format("%B %-d, %Y %H:%M").to_string())
                        .unwrap_or_default(),
                    _ => String::new(),
                };
                Ok(tera::Value::String(formatted))
            },
        );

        tera.register_filter(
            "category_label",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let slug = tera::try_get_value!("category_label", "value", String, value);
                let label = Category::from_slug(&slug)
                    .map(|c| c.label().to_string())
                    .unwrap_or(slug);
                Ok(tera::Value::String(label))
            },
        );
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Templates are tried in order; the first one that exists is returned.
    /// Results are cached for performance.
    ///
    /// Example suggestions: `["post--news", "post"]`
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        if suggestions.is_empty() {
            return None;
        }

        let cache_key = suggestions.join("|");
        if let Some(cached) = self.suggestion_cache.get(&cache_key) {
            return Some(cached.clone());
        }

        for suggestion in suggestions {
            let template_name = format!("{suggestion}.html");
            if self.tera.get_template(&template_name).is_ok() {
                self.suggestion_cache
                    .insert(cache_key, template_name.clone());
                return Some(template_name);
            }

            if self.tera.get_template(suggestion).is_ok() {
                let name = (*suggestion).to_string();
                self.suggestion_cache.insert(cache_key, name.clone());
                return Some(name);
            }
        }

        // Negative results are not cached
        None
    }

    /// Generate template suggestions shared by every post in a category.
    ///
    /// Returns suggestions from most specific to least:
    /// - `post--{category}`
    /// - `post`
    pub fn post_suggestions(post: &Post) -> Vec<String> {
        let mut suggestions = Vec::with_capacity(2);
        if !post.category.is_empty() {
            suggestions.push(format!("post--{}", post.category));
        }
        suggestions.push("post".to_string());
        suggestions
    }

    /// A `post--{category}--{id}.html` override for one post, if present.
    ///
    /// Looked up directly rather than through the suggestion cache, which
    /// would otherwise gain an entry per post.
    fn post_override(&self, post: &Post) -> Option<String> {
        if post.category.is_empty() {
            return None;
        }
        let name = format!("post--{}--{}.html", post.category, post.id);
        self.tera.get_template(&name).is_ok().then_some(name)
    }

    /// Render a post page around the already-rendered document body.
    pub fn render_post_page(&self, post: &Post, body_html: &str) -> Result<String> {
        let template = self.post_override(post).unwrap_or_else(|| {
            let suggestions = Self::post_suggestions(post);
            let suggestion_refs: Vec<&str> = suggestions.iter().map(|s| s.as_str()).collect();
            self.resolve_template(&suggestion_refs)
                .unwrap_or_else(|| "post.html".to_string())
        });

        let mut context = tera::Context::new();
        context.insert("site_name", SITE_NAME);
        context.insert("title", &post.title);
        context.insert("post", post);
        context.insert("body", body_html);

        self.tera
            .render(&template, &context)
            .context("failed to render post template")
    }

    /// Render a simple message page, e.g. for errors.
    pub fn render_message_page(&self, title: &str, message: &str, status: u16) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("site_name", SITE_NAME);
        context.insert("title", title);
        context.insert("message", message);
        context.insert("status", &status);

        self.tera
            .render("message.html", &context)
            .context("failed to render message template")
    }
}

/// Format a backend date string; unparseable input is returned unchanged.
fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%B %-d, %Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%B %-d, %Y %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%B %-d, %Y").to_string();
    }
    raw.to_string()
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("template_count", &self.tera.get_template_names().count())
            .field("cache_size", &self.suggestion_cache.len())
            .finish()
    }
}
