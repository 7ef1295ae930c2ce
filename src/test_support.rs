//! Shared fixtures for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};

use crate::cms::{FetchError, PostSource};
use crate::config::SiteConfig;
use crate::content::Post;
use crate::view::PageRenderer;

/// A post document as the query API returns it
pub fn post_json(slug: &str, title: &str, body: Value) -> Value {
    json!({
        "id": format!("post-{}", slug),
        "title": title,
        "slug": {"_type": "slug", "current": slug},
        "author": "Xorbi",
        "publishedAt": "2024-05-01T10:00:00Z",
        "_createdAt": "2024-04-30T09:00:00Z",
        "body": body
    })
}

/// A short body with a paragraph and an image
pub fn sample_body() -> Value {
    json!([
        {
            "_type": "block",
            "_key": "intro",
            "style": "normal",
            "markDefs": [],
            "children": [{"_type": "span", "text": "A pinch of salt.", "marks": []}]
        },
        {
            "_type": "image",
            "_key": "pic",
            "asset": {"_type": "reference", "_ref": "image-abc123-800x600-jpg"},
            "alt": "Soup in a bowl"
        }
    ])
}

pub fn post(slug: &str, title: &str) -> Post {
    serde_json::from_value(post_json(slug, title, sample_body())).unwrap()
}

pub fn post_with_body(slug: &str, title: &str, body: Value) -> Post {
    serde_json::from_value(post_json(slug, title, body)).unwrap()
}

pub fn site_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.cms.project_id = "proj".to_string();
    config
}

pub fn page_renderer() -> PageRenderer {
    PageRenderer::new(site_config()).unwrap()
}

/// In-memory post source
#[derive(Debug, Default)]
pub struct StaticSource {
    posts: Vec<Post>,
    failing: bool,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    /// A source whose every query fails with a 503
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Number of queries issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn query(&self) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(FetchError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl PostSource for StaticSource {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        self.query().await?;
        Ok(self.posts.clone())
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, FetchError> {
        self.query().await?;
        Ok(self.posts.iter().find(|p| p.slug.as_str() == slug).cloned())
    }
}
