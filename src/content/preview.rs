//! Post previews for the list page
//!
//! A preview is derived from the body on every render and never stored.

use super::block::Block;
use crate::cms::{FitMode, ImageUrlBuilder};
use crate::config::PreviewConfig;
use crate::helpers::truncate;

/// Text shown when a body yields no preview text
pub const NO_PREVIEW: &str = "No preview available";

/// Truncated lead text plus an optional lead image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub text: String,
    pub image_url: Option<String>,
}

impl Preview {
    /// Scan `body` in order for preview text and the first image.
    ///
    /// Text blocks are joined with single spaces. Scanning stops once the text
    /// exceeds `config.length` characters (the text is then cut to exactly
    /// that many characters plus `config.omission`) or at the first image
    /// block with a resolvable asset.
    pub fn from_body(body: &[Block], images: &ImageUrlBuilder, config: &PreviewConfig) -> Self {
        let mut text = String::new();
        let mut image_url = None;

        for block in body {
            match block {
                Block::Text(block) => {
                    let block_text = block
                        .spans()
                        .map(|span| span.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    if block_text.is_empty() {
                        continue;
                    }
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(&block_text);

                    if text.chars().count() > config.length {
                        text = truncate(&text, config.length, &config.omission);
                        break;
                    }
                }
                Block::Image(image) => {
                    let Some(asset_ref) = image.asset_ref() else {
                        continue;
                    };
                    match images.build(
                        asset_ref,
                        config.image_width,
                        config.image_height,
                        FitMode::Max,
                    ) {
                        Ok(url) => {
                            image_url = Some(url);
                            break;
                        }
                        Err(e) => tracing::debug!("Skipping preview image: {}", e),
                    }
                }
                Block::Unknown(_) => {}
            }
        }

        if text.is_empty() {
            text = NO_PREVIEW.to_string();
        }

        Self { text, image_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CmsConfig;
    use serde_json::{json, Value};

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new(&CmsConfig {
            project_id: "proj".to_string(),
            dataset: "blog".to_string(),
            ..CmsConfig::default()
        })
    }

    fn body(blocks: Value) -> Vec<Block> {
        serde_json::from_value(blocks).unwrap()
    }

    fn text_block(text: &str) -> Value {
        json!({"_type": "block", "style": "normal", "children": [{"_type": "span", "text": text, "marks": []}]})
    }

    fn image_block(asset: &str) -> Value {
        json!({"_type": "image", "asset": {"_ref": asset}})
    }

    fn preview(blocks: Value) -> Preview {
        Preview::from_body(&body(blocks), &images(), &PreviewConfig::default())
    }

    #[test]
    fn test_short_text_without_images() {
        let p = preview(json!([text_block("Warm the pan."), text_block("Add butter.")]));
        assert_eq!(p.text, "Warm the pan. Add butter.");
        assert_eq!(p.image_url, None);
    }

    #[test]
    fn test_spans_within_a_block_are_joined() {
        let p = preview(json!([{
            "_type": "block",
            "children": [
                {"_type": "span", "text": "Salt"},
                {"_type": "emoji", "name": "salt"},
                {"_type": "span", "text": "pepper"}
            ]
        }]));
        assert_eq!(p.text, "Salt pepper");
    }

    #[test]
    fn test_long_text_is_truncated_at_threshold() {
        let long = "a".repeat(100);
        let p = preview(json!([text_block(&long), text_block(&"b".repeat(100))]));
        assert_eq!(p.text.chars().count(), 150 + 3);
        assert!(p.text.ends_with("..."));
        let expected_prefix = format!("{} {}", long, "b".repeat(49));
        assert_eq!(&p.text[..150], expected_prefix);
    }

    #[test]
    fn test_truncation_respects_multibyte_characters() {
        let p = preview(json!([text_block(&"é🍮".repeat(100))]));
        assert_eq!(p.text.chars().count(), 153);
        assert!(p.text.starts_with("é🍮é🍮"));
        assert!(p.text.ends_with("..."));
    }

    #[test]
    fn test_first_image_wins() {
        let p = preview(json!([
            image_block("image-first-100x100-jpg"),
            text_block("never reached"),
            image_block("image-second-100x100-jpg")
        ]));
        let url = p.image_url.unwrap();
        assert!(url.contains("/first-100x100.jpg?w=300&h=200&fit=max"));
        assert_eq!(p.text, NO_PREVIEW);
    }

    #[test]
    fn test_text_before_image_is_kept() {
        let p = preview(json!([
            text_block("Intro."),
            image_block("image-pic-100x100-png"),
            text_block("After.")
        ]));
        assert_eq!(p.text, "Intro.");
        assert!(p.image_url.is_some());
    }

    #[test]
    fn test_unresolvable_images_do_not_stop_scanning() {
        let p = preview(json!([
            {"_type": "image"},
            image_block("not-a-ref"),
            text_block("Still here."),
            image_block("image-ok-1x1-gif")
        ]));
        assert_eq!(p.text, "Still here.");
        assert!(p.image_url.unwrap().contains("/ok-1x1.gif"));
    }

    #[test]
    fn test_empty_body() {
        let p = Preview::from_body(&[], &images(), &PreviewConfig::default());
        assert_eq!(p.text, NO_PREVIEW);
        assert_eq!(p.image_url, None);
    }

    #[test]
    fn test_unknown_blocks_are_skipped() {
        let p = preview(json!([{"_type": "youtube", "url": "x"}, text_block("Hello")]));
        assert_eq!(p.text, "Hello");
    }
}
