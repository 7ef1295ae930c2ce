//! Page views
//!
//! The list view and the detail view each own a [`ViewController`] and render
//! their current state through the embedded templates. A [`PageRenderer`]
//! bundles everything the views need and is built once at startup.
//!
//! The server and the generator await every fetch before rendering, so the
//! `Loading` pages (the skeleton templates) are never served; they exist so
//! that each view state has a rendering.

mod detail;
mod list;
mod state;

pub use detail::DetailView;
pub use list::{post_card, ListView};
pub use state::{FetchTicket, ViewController, ViewError, ViewState};

use anyhow::Result;
use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use tera::Context;

use crate::cms::ImageUrlBuilder;
use crate::config::SiteConfig;
use crate::helpers::html_escape;
use crate::templates::{SiteData, TemplateRenderer, ThemeData, PLACEHOLDER_IMAGE_PATH};
use crate::theme::{ThemeOption, ThemeSettings};

/// A rendered page and the status it is served with
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub html: String,
}

/// Configuration, templates, image URLs and theme settings shared by all views
pub struct PageRenderer {
    config: SiteConfig,
    templates: TemplateRenderer,
    images: ImageUrlBuilder,
    themes: ThemeSettings,
}

impl PageRenderer {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let templates = TemplateRenderer::new()?;
        let images = ImageUrlBuilder::new(&config.cms);
        let themes = ThemeSettings::from_config(&config.theme);
        tracing::debug!(
            "Themes {:?}, default {:?}",
            themes.available(),
            themes.default_theme()
        );
        Ok(Self {
            config,
            templates,
            images,
            themes,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    pub fn themes(&self) -> &ThemeSettings {
        &self.themes
    }

    /// Context for one page render.
    ///
    /// `interactive` enables the theme switcher, which needs the live server.
    pub fn context<'a>(&'a self, theme: &'a str, path: &'a str, interactive: bool) -> ViewContext<'a> {
        ViewContext {
            pages: self,
            theme,
            path,
            interactive,
        }
    }
}

/// Per-request rendering context
pub struct ViewContext<'a> {
    pages: &'a PageRenderer,
    theme: &'a str,
    path: &'a str,
    interactive: bool,
}

impl<'a> ViewContext<'a> {
    pub fn config(&self) -> &'a SiteConfig {
        &self.pages.config
    }

    pub fn images(&self) -> &'a ImageUrlBuilder {
        &self.pages.images
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Template context with the site chrome filled in
    pub fn template_context(&self) -> Context {
        let themes = &self.pages.themes;
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData::from_config(&self.pages.config, Utc::now().year()),
        );
        context.insert(
            "theme",
            &ThemeData {
                current: html_escape(self.theme),
                storage_key: html_escape(themes.storage_key()),
                switcher: self.interactive,
                options: themes
                    .options(self.theme, self.path)
                    .into_iter()
                    .map(|option| ThemeOption {
                        name: html_escape(&option.name),
                        ..option
                    })
                    .collect(),
            },
        );
        context.insert("placeholder_url", PLACEHOLDER_IMAGE_PATH);
        context.insert("current_path", &html_escape(self.path));
        context
    }

    pub fn render(&self, status: StatusCode, template: &str, context: &Context) -> Result<Page> {
        let html = self.pages.templates.render(template, context)?;
        Ok(Page { status, html })
    }

    /// The failure panel with a reload link back to this page
    pub fn error_page(&self, message: &str) -> Result<Page> {
        let mut context = self.template_context();
        context.insert("message", &html_escape(message));
        context.insert("retry_path", &html_escape(self.path));
        self.render(StatusCode::BAD_GATEWAY, "error.html", &context)
    }

    pub fn not_found_page(&self, heading: &str, message: &str) -> Result<Page> {
        let mut context = self.template_context();
        context.insert("heading", &html_escape(heading));
        context.insert("message", &html_escape(message));
        self.render(StatusCode::NOT_FOUND, "not_found.html", &context)
    }
}
