//! Post list view

use anyhow::Result;
use axum::http::StatusCode;

use super::state::{ViewController, ViewError, ViewState};
use super::{Page, ViewContext};
use crate::cms::{ImageUrlBuilder, PostSource};
use crate::config::PreviewConfig;
use crate::content::{Post, Preview};
use crate::helpers::{date_xml, html_escape, post_path};
use crate::templates::{PostCard, LIST_SKELETON_CARDS};

/// The home page: every post as a card, newest first
#[derive(Debug, Default)]
pub struct ListView {
    controller: ViewController<Vec<Post>>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<Vec<Post>> {
        self.controller.state()
    }

    /// Fetch the post list. Returns whether the result was applied.
    pub async fn load<S: PostSource>(&mut self, source: &S) -> bool {
        let mut ticket = self.controller.begin();
        let Some(result) = ticket.run(source.list_posts()).await else {
            tracing::debug!("Post list fetch superseded");
            return false;
        };

        let outcome = result.map_err(|e| {
            if e.is_transport() {
                tracing::warn!("CMS unreachable while fetching posts: {}", e);
            } else {
                tracing::error!("Error fetching posts: {}", e);
            }
            ViewError::Fetch("Failed to load posts. Please try again later.".to_string())
        });
        self.controller.resolve(&ticket, outcome)
    }

    pub fn render(&self, ctx: &ViewContext<'_>) -> Result<Page> {
        match self.state() {
            ViewState::Loading => {
                let mut context = ctx.template_context();
                context.insert("skeletons", &LIST_SKELETON_CARDS);
                ctx.render(StatusCode::OK, "list_loading.html", &context)
            }
            ViewState::Ready(posts) => {
                let config = ctx.config();
                let cards: Vec<PostCard> = posts
                    .iter()
                    .map(|post| post_card(post, ctx.images(), &config.preview))
                    .collect();
                tracing::debug!("Rendering {} post cards", cards.len());

                let mut context = ctx.template_context();
                context.insert("posts", &cards);
                ctx.render(StatusCode::OK, "index.html", &context)
            }
            ViewState::Failed(error) => ctx.error_page(error.message()),
        }
    }
}

/// Card data for one post, with its preview derived from the body
pub fn post_card(post: &Post, images: &ImageUrlBuilder, preview: &PreviewConfig) -> PostCard {
    let Preview { text, image_url } = Preview::from_body(&post.body, images, preview);

    PostCard {
        title: html_escape(post.display_title()),
        path: html_escape(&post_path(post.slug.as_str())),
        author: post.display_author().map(html_escape),
        date: post.display_date().map(|d| html_escape(&d)),
        datetime: post.published_at.as_ref().or(post.created_at.as_ref()).map(date_xml),
        preview_text: html_escape(&text),
        preview_image: image_url.as_deref().map(html_escape),
    }
}
