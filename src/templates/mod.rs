//! Built-in kitchen templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Autoescaping is off:
//! every string in the context structs below is already HTML-escaped by the
//! code that builds it, and the post body arrives as rendered HTML.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::html_escape;
use crate::theme::ThemeOption;

/// Path the placeholder image is served from
pub const PLACEHOLDER_IMAGE_PATH: &str = "/placeholder-image.svg";

/// Placeholder shown when a post image fails to load
pub const PLACEHOLDER_IMAGE_SVG: &str = include_str!("kitchen/placeholder-image.svg");

/// Number of skeleton cards on the loading list page
pub const LIST_SKELETON_CARDS: usize = 6;

/// Template renderer with the embedded kitchen templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Tera's escaper also rewrites `/`, which mangles hrefs; values are
        // escaped when the context is built instead
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("kitchen/layout.html")),
            ("index.html", include_str!("kitchen/index.html")),
            ("list_loading.html", include_str!("kitchen/list_loading.html")),
            ("post.html", include_str!("kitchen/post.html")),
            ("post_loading.html", include_str!("kitchen/post_loading.html")),
            ("error.html", include_str!("kitchen/error.html")),
            ("not_found.html", include_str!("kitchen/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("kitchen/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("kitchen/partials/footer.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("kitchen/partials/post_card.html"),
            ),
            (
                "partials/style.css",
                include_str!("kitchen/partials/style.css"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context. String fields hold escaped HTML.

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub language: String,
    pub year: i32,
    pub footer: FooterData,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig, year: i32) -> Self {
        Self {
            title: html_escape(&config.title),
            subtitle: html_escape(&config.subtitle),
            language: html_escape(&config.language),
            year,
            footer: FooterData {
                link_text: html_escape(&config.footer.link_text),
                link_url: html_escape(&config.footer.link_url),
                tagline: html_escape(&config.footer.tagline),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FooterData {
    pub link_text: String,
    pub link_url: String,
    pub tagline: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeData {
    pub current: String,
    pub storage_key: String,
    /// Whether the theme links are shown (they need the live server)
    pub switcher: bool,
    pub options: Vec<ThemeOption>,
}

/// One card on the list page
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub title: String,
    pub path: String,
    pub author: Option<String>,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub preview_text: String,
    pub preview_image: Option<String>,
}

/// A full post page
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub path: String,
    pub author: Option<String>,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub body_html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from_config(&SiteConfig::default(), 2024));
        context.insert(
            "theme",
            &ThemeData {
                current: "dark".to_string(),
                storage_key: "k".to_string(),
                switcher: true,
                options: vec![ThemeOption {
                    name: "dark".to_string(),
                    path: "/theme/dark?to=%2F".to_string(),
                    active: true,
                }],
            },
        );
        context.insert("placeholder_url", PLACEHOLDER_IMAGE_PATH);
        context
    }

    #[test]
    fn test_all_templates_parse() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_layout_carries_theme_class_and_chrome() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("posts", &Vec::<PostCard>::new());
        let html = renderer.render("index.html", &context).unwrap();

        assert!(html.contains(r#"<html lang="en" class="dark">"#));
        assert!(html.contains("xorbi&#39;s kitchen"));
        assert!(html.contains("&copy; 2024"));
        assert!(html.contains("Powered by Sanity"));
        assert!(html.contains("No posts yet"));
    }

    #[test]
    fn test_context_values_are_inserted_verbatim() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert(
            "post",
            &PostData {
                title: html_escape("<Pie>"),
                path: "/post/pie".to_string(),
                author: None,
                date: None,
                datetime: None,
                body_html: "<p>crust</p>".to_string(),
            },
        );
        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<p>crust</p>"));
        assert!(html.contains("&lt;Pie&gt;"));
        assert!(!html.contains("<Pie>"));
        assert!(html.contains(r#"href="/theme/dark?to=%2F""#));
    }

    #[test]
    fn test_placeholder_is_svg() {
        assert!(PLACEHOLDER_IMAGE_SVG.trim_start().starts_with("<svg"));
    }
}
