//! Content module - post model, portable rich text and previews

mod block;
mod portable_text;
mod post;
mod preview;

pub use block::{
    AssetReference, Block, BlockStyle, ImageBlock, Inline, ListKind, Mark, MarkDef, Span,
    TextBlock, UnknownNode,
};
pub use portable_text::{PortableTextRenderer, BODY_IMAGE_HEIGHT, BODY_IMAGE_WIDTH};
pub use post::{Post, Slug};
pub use preview::{Preview, NO_PREVIEW};
