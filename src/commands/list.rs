//! List posts from the CMS

use anyhow::Result;

use crate::cms::{CmsClient, PostSource};
use crate::content::Post;
use crate::Kitchen;

/// Print every post, newest first
pub async fn run(kitchen: &Kitchen) -> Result<()> {
    let source = CmsClient::new(&kitchen.config.cms)?;
    let posts = source.list_posts().await?;

    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("{}", format_line(post));
    }

    Ok(())
}

fn format_line(post: &Post) -> String {
    let date = post
        .published_at
        .or(post.created_at)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    format!("  {} - {} [{}]", date, post.display_title(), post.slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::post;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(&post("soup", "Tomato soup")),
            "  2024-05-01 - Tomato soup [soup]"
        );

        let mut undated = post("bare", "");
        undated.published_at = None;
        undated.created_at = None;
        assert_eq!(format_line(&undated), "  ---------- - Untitled [bare]");
    }
}
