//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped when a value is placed in a single path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Encode a value for use as one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Path of the detail page for a post slug
///
/// # Examples
/// ```ignore
/// post_path("my-first-post") // -> "/post/my-first-post"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("/post/{}", encode_segment(slug))
}

/// Path that persists a theme preference and returns to the current page
pub fn theme_path(theme: &str) -> String {
    format!("/theme/{}", encode_segment(theme))
}
