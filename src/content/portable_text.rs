//! Portable rich text to HTML
//!
//! The renderer is total: every block style, list style, mark and inline or
//! block type has an arm, and unrecognized variants render a visible inert
//! fallback instead of failing the document.

use super::block::{Block, BlockStyle, ImageBlock, Inline, ListKind, Mark, TextBlock, UnknownNode};
use crate::cms::{FitMode, ImageUrlBuilder};
use crate::helpers::{html_escape, open_tag};

/// Target box for images inside a post body
pub const BODY_IMAGE_WIDTH: u32 = 4000;
pub const BODY_IMAGE_HEIGHT: u32 = 900;

/// Deepest list nesting rendered; deeper items render at this level
const MAX_LIST_DEPTH: u32 = 16;

/// Renders post bodies to HTML
pub struct PortableTextRenderer<'a> {
    images: &'a ImageUrlBuilder,
    placeholder_url: &'a str,
}

impl<'a> PortableTextRenderer<'a> {
    /// `placeholder_url` is swapped in by the browser when an image fails to load
    pub fn new(images: &'a ImageUrlBuilder, placeholder_url: &'a str) -> Self {
        Self {
            images,
            placeholder_url,
        }
    }

    /// Render a body, one element per block (one per list), in body order
    pub fn render(&self, body: &[Block]) -> String {
        let mut out = String::new();
        let mut i = 0;

        while i < body.len() {
            if body[i].list_item().is_some() {
                let items: Vec<&TextBlock> = body[i..]
                    .iter()
                    .map_while(|block| match block {
                        Block::Text(text) if text.list_item.is_some() => Some(text),
                        _ => None,
                    })
                    .collect();
                i += items.len();
                self.render_lists(&items, &mut out);
                continue;
            }

            match &body[i] {
                Block::Text(text) => self.render_text_block(text, &mut out),
                Block::Image(image) => self.render_image(image, &mut out),
                Block::Unknown(node) => render_unknown_block(node, &mut out),
            }
            out.push('\n');
            i += 1;
        }

        out
    }

    fn render_text_block(&self, block: &TextBlock, out: &mut String) {
        let tag = match &block.style {
            BlockStyle::Normal => "p".to_string(),
            BlockStyle::Heading(level) => format!("h{}", level),
            BlockStyle::Blockquote => "blockquote".to_string(),
            BlockStyle::Other(style) => {
                tracing::debug!("Unknown block style {:?}, rendering as paragraph", style);
                "p".to_string()
            }
        };

        out.push_str(&open_tag(&tag, None));
        self.render_children(block, out);
        out.push_str(&format!("</{}>", tag));
    }

    /// Render a run of consecutive list items as one or more (nested) lists
    fn render_lists(&self, items: &[&TextBlock], out: &mut String) {
        let levels = nesting_levels(items);
        let mut i = 0;
        while i < items.len() {
            i = self.render_list_at(items, &levels, i, out);
        }
        out.push('\n');
    }

    /// Render the list starting at `items[start]`; returns the index after it.
    ///
    /// Items deeper than the list level nest inside the preceding item. The
    /// list ends at a shallower item or a same-level item of another kind.
    fn render_list_at(
        &self,
        items: &[&TextBlock],
        levels: &[u32],
        start: usize,
        out: &mut String,
    ) -> usize {
        let level = levels[start];
        let kind = items[start].list_item.as_ref();
        let (list_tag, class) = match kind {
            Some(ListKind::Bullet) | None => ("ul", None),
            Some(ListKind::Number) => ("ol", None),
            Some(ListKind::Other(_)) => ("ul", Some("pt-unknown-list")),
        };

        out.push_str(&open_tag(list_tag, class));
        let mut i = start;
        while i < items.len() {
            let item = items[i];
            if levels[i] < level || (levels[i] == level && item.list_item.as_ref() != kind) {
                break;
            }

            out.push_str("<li>");
            self.render_children(item, out);
            i += 1;
            while i < items.len() && levels[i] > level {
                i = self.render_list_at(items, levels, i, out);
            }
            out.push_str("</li>");
        }
        out.push_str(&format!("</{}>", list_tag));
        i
    }

    /// Render spans, wrapping runs of spans that share a mark in one element
    fn render_children(&self, block: &TextBlock, out: &mut String) {
        let mut open: Vec<(&str, String)> = Vec::new();

        for (index, child) in block.children.iter().enumerate() {
            let marks = sorted_marks(&block.children, index);

            if let Some(pos) = open.iter().position(|(key, _)| !marks.contains(key)) {
                for (_, close) in open.drain(pos..).rev() {
                    out.push_str(&close);
                }
            }
            for key in marks {
                if !open.iter().any(|(open_key, _)| *open_key == key) {
                    let (start_tag, end_tag) = mark_tags(&block.resolve_mark(key));
                    out.push_str(&start_tag);
                    open.push((key, end_tag));
                }
            }

            match child {
                Inline::Span(span) => {
                    out.push_str(&html_escape(&span.text).replace('\n', "<br/>"));
                }
                Inline::Unknown(node) => {
                    out.push_str(&format!(
                        r#"<span class="pt-unknown">Unsupported content: {}</span>"#,
                        html_escape(&node.debug_json())
                    ));
                }
            }
        }

        for (_, close) in open.into_iter().rev() {
            out.push_str(&close);
        }
    }

    fn render_image(&self, image: &ImageBlock, out: &mut String) {
        let Some(asset_ref) = image.asset_ref() else {
            out.push_str(r#"<div class="pt-unavailable">Image data unavailable</div>"#);
            return;
        };

        let src = match self.images.build(
            asset_ref,
            BODY_IMAGE_WIDTH,
            BODY_IMAGE_HEIGHT,
            FitMode::Scale,
        ) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Rendering placeholder for image: {}", e);
                self.placeholder_url.to_string()
            }
        };

        let placeholder = html_escape(self.placeholder_url);
        out.push_str(&format!(
            r#"<figure class="post-image"><img src="{}" alt="{}" loading="lazy" onerror="this.onerror=null;this.src='{}'">"#,
            html_escape(&src),
            html_escape(image.alt_text().unwrap_or("Image from post")),
            placeholder
        ));
        if let Some(alt) = image.alt_text() {
            out.push_str(&format!("<figcaption>{}</figcaption>", html_escape(alt)));
        }
        out.push_str("</figure>");
    }
}

/// Effective nesting level of each list item.
///
/// An item is at most one level deeper than the item before it, and no
/// deeper than `MAX_LIST_DEPTH`, which bounds the recursion in
/// `render_list_at`.
fn nesting_levels(items: &[&TextBlock]) -> Vec<u32> {
    let mut levels = Vec::with_capacity(items.len());
    let mut previous = 0;
    for item in items {
        let level = item.level().min(previous + 1).min(MAX_LIST_DEPTH);
        levels.push(level);
        previous = level;
    }
    levels
}

fn render_unknown_block(node: &UnknownNode, out: &mut String) {
    tracing::debug!("Rendering fallback for unknown block type {:?}", node.type_name);
    out.push_str(&format!(
        r#"<div class="pt-unknown">Unsupported content: {}</div>"#,
        html_escape(&node.debug_json())
    ));
}

/// Marks of the span at `index`, longest-running first
fn sorted_marks(children: &[Inline], index: usize) -> Vec<&str> {
    let Inline::Span(span) = &children[index] else {
        return Vec::new();
    };

    let mut marks: Vec<&str> = Vec::with_capacity(span.marks.len());
    for mark in &span.marks {
        if !marks.contains(&mark.as_str()) {
            marks.push(mark);
        }
    }

    let run_length = |mark: &str| {
        children[index..]
            .iter()
            .take_while(|child| {
                matches!(child, Inline::Span(span) if span.marks.iter().any(|m| m == mark))
            })
            .count()
    };
    marks.sort_by_key(|mark| std::cmp::Reverse(run_length(*mark)));
    marks
}

/// Opening and closing tags for a mark
fn mark_tags(mark: &Mark) -> (String, String) {
    let simple = |tag: &str| (format!("<{}>", tag), format!("</{}>", tag));

    match mark {
        Mark::Strong => simple("strong"),
        Mark::Emphasis => simple("em"),
        Mark::Code => simple("code"),
        Mark::StrikeThrough => simple("del"),
        Mark::Underline => (
            r#"<span style="text-decoration: underline">"#.to_string(),
            "</span>".to_string(),
        ),
        Mark::Link { href } if is_safe_href(href) => (
            format!(r#"<a href="{}" rel="noopener noreferrer">"#, html_escape(href)),
            "</a>".to_string(),
        ),
        Mark::Link { href } => {
            tracing::debug!("Dropping link with unsafe href {:?}", href);
            inert_mark("link")
        }
        Mark::Unknown(name) => inert_mark(name),
    }
}

fn inert_mark(name: &str) -> (String, String) {
    (
        format!(r#"<span class="pt-unknown-mark" data-mark="{}">"#, html_escape(name)),
        "</span>".to_string(),
    )
}

/// Links may point at http(s), mail, same-site paths or fragments
fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("mailto:")
        || (href.starts_with('/') && !href.starts_with("//"))
        || href.starts_with('#')
}
