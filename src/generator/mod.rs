//! Generator module - exports the site as static HTML files
//!
//! The same views the server uses are rendered once with the default theme
//! and written under the public directory:
//!
//! - `index.html` for the post list
//! - `post/{slug}/index.html` for each post
//! - `404.html` and the placeholder image

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cms::PostSource;
use crate::config::SiteConfig;
use crate::helpers::post_path;
use crate::templates::PLACEHOLDER_IMAGE_SVG;
use crate::view::{DetailView, ListView, Page, PageRenderer, ViewState};

/// Counts reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub posts: usize,
    pub skipped: usize,
}

/// Static site generator
pub struct Generator {
    public_dir: PathBuf,
    pages: PageRenderer,
}

impl Generator {
    /// Create a new generator writing into `public_dir`
    pub fn new<P: AsRef<Path>>(public_dir: P, config: SiteConfig) -> Result<Self> {
        Ok(Self {
            public_dir: public_dir.as_ref().to_path_buf(),
            pages: PageRenderer::new(config)?,
        })
    }

    /// Fetch every post and write the site
    pub async fn generate<S: PostSource>(&self, source: &S) -> Result<GenerateStats> {
        let mut list = ListView::new();
        list.load(source).await;
        let posts = match list.state() {
            ViewState::Ready(posts) => posts,
            ViewState::Failed(error) => bail!("Could not fetch posts: {}", error.message()),
            ViewState::Loading => bail!("Post list fetch was abandoned"),
        };
        tracing::info!("Fetched {} posts", posts.len());

        fs::create_dir_all(&self.public_dir)?;
        let theme = self.pages.themes().default_theme();

        let index = list.render(&self.pages.context(theme, "/", false))?;
        self.write_page(Path::new("index.html"), &index)?;

        let mut stats = GenerateStats::default();
        for post in posts {
            if !post.slug.is_path_safe() {
                tracing::warn!("Skipping post {} with unusable slug {:?}", post.id, post.slug.as_str());
                stats.skipped += 1;
                continue;
            }

            let path = post_path(post.slug.as_str());
            let view = DetailView::with_post(post.clone());
            let page = view.render(&self.pages.context(theme, &path, false))?;
            let file = Path::new("post").join(post.slug.as_str()).join("index.html");
            self.write_page(&file, &page)?;
            stats.posts += 1;
        }

        let not_found = self
            .pages
            .context(theme, "/404.html", false)
            .not_found_page("Page Not Found", "The page you're looking for doesn't exist.")?;
        self.write_page(Path::new("404.html"), &not_found)?;

        fs::write(
            self.public_dir.join("placeholder-image.svg"),
            PLACEHOLDER_IMAGE_SVG,
        )?;

        Ok(stats)
    }

    fn write_page(&self, relative: &Path, page: &Page) -> Result<()> {
        let output = self.public_dir.join(relative);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output, &page.html)?;
        tracing::debug!("Generated: {:?}", output);
        Ok(())
    }
}
