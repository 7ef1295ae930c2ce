//! Single post view

use anyhow::Result;
use axum::http::StatusCode;

use super::state::{ViewController, ViewError, ViewState};
use super::{Page, ViewContext};
use crate::cms::PostSource;
use crate::content::{PortableTextRenderer, Post};
use crate::helpers::{date_xml, html_escape, post_path};
use crate::templates::{PostData, PLACEHOLDER_IMAGE_PATH};

/// The page for one post, addressed by slug
#[derive(Debug)]
pub struct DetailView {
    slug: String,
    controller: ViewController<Post>,
}

impl DetailView {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            controller: ViewController::new(),
        }
    }

    /// A view that is already showing `post`, without a fetch
    pub fn with_post(post: Post) -> Self {
        let mut view = Self::new(post.slug.as_str());
        let ticket = view.controller.begin();
        view.controller.resolve(&ticket, Ok(post));
        view
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn state(&self) -> &ViewState<Post> {
        self.controller.state()
    }

    /// Fetch the post. Returns whether the result was applied.
    pub async fn load<S: PostSource>(&mut self, source: &S) -> bool {
        let mut ticket = self.controller.begin();
        let Some(result) = ticket.run(source.get_post_by_slug(&self.slug)).await else {
            tracing::debug!("Fetch for post {:?} superseded", self.slug);
            return false;
        };

        let outcome = match result {
            Ok(Some(post)) => Ok(post),
            Ok(None) => {
                tracing::info!("No post with slug {:?}", self.slug);
                Err(ViewError::NotFound)
            }
            Err(e) if e.is_transport() => {
                tracing::warn!("CMS unreachable while fetching post {:?}: {}", self.slug, e);
                Err(ViewError::Fetch(
                    "Failed to load post. Please try again later.".to_string(),
                ))
            }
            Err(e) => {
                tracing::error!("Error fetching post {:?}: {}", self.slug, e);
                Err(ViewError::Fetch(
                    "Failed to load post. Please try again later.".to_string(),
                ))
            }
        };
        self.controller.resolve(&ticket, outcome)
    }

    pub fn render(&self, ctx: &ViewContext<'_>) -> Result<Page> {
        match self.state() {
            ViewState::Loading => {
                let context = ctx.template_context();
                ctx.render(StatusCode::OK, "post_loading.html", &context)
            }
            ViewState::Ready(post) => {
                let body_html = PortableTextRenderer::new(ctx.images(), PLACEHOLDER_IMAGE_PATH)
                    .render(&post.body);
                let data = PostData {
                    title: html_escape(post.display_title()),
                    path: html_escape(&post_path(post.slug.as_str())),
                    author: post.display_author().map(html_escape),
                    date: post.display_date().map(|d| html_escape(&d)),
                    datetime: post
                        .published_at
                        .as_ref()
                        .or(post.created_at.as_ref())
                        .map(date_xml),
                    body_html,
                };

                let mut context = ctx.template_context();
                context.insert("post", &data);
                ctx.render(StatusCode::OK, "post.html", &context)
            }
            ViewState::Failed(ViewError::NotFound) => {
                ctx.not_found_page("Post Not Found", ViewError::NotFound.message())
            }
            ViewState::Failed(error) => ctx.error_page(error.message()),
        }
    }
}
