//! Content service client
//!
//! Two read-only queries against the hosted CMS (all posts, one post by slug)
//! and a pure image URL builder for the CMS image CDN.

mod client;
mod error;
mod image;
pub mod query;

pub use client::{CmsClient, PostSource};
pub use error::FetchError;
pub use image::{FitMode, ImageUrlBuilder, ImageUrlError};
