//! Post model as returned by the CMS queries

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::block::Block;
use crate::helpers::byline_date;

/// A blog post. Posts are read-only here; the CMS owns them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    /// Document id
    pub id: String,

    /// Post title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// URL-safe unique identifier
    pub slug: Slug,

    /// Author name (dereferenced by the query)
    #[serde(default)]
    pub author: Option<String>,

    /// Publication date
    #[serde(default, rename = "publishedAt", deserialize_with = "lenient_date")]
    pub published_at: Option<DateTime<Utc>>,

    /// Document creation date
    #[serde(default, rename = "_createdAt", deserialize_with = "lenient_date")]
    pub created_at: Option<DateTime<Utc>>,

    /// Portable rich text body, in render order
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<Block>,
}

impl Post {
    /// Title to show, never empty
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            "Untitled"
        } else {
            title
        }
    }

    /// Author to show, if any
    pub fn display_author(&self) -> Option<&str> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
    }

    /// Byline date: published date, falling back to the creation date
    pub fn display_date(&self) -> Option<String> {
        byline_date(self.published_at.as_ref(), self.created_at.as_ref())
    }
}

/// Post slug, wire shape `{"current": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.current
    }

    /// Whether the slug can be used as a single file-system path component
    pub fn is_path_safe(&self) -> bool {
        let slug = self.current.as_str();
        !slug.is_empty()
            && slug != "."
            && slug != ".."
            && !slug.contains(['/', '\\', '\0'])
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.current)
    }
}

/// Treat an explicit `null` like a missing field
pub(super) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept RFC 3339 timestamps and plain dates; anything else reads as absent
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| v.as_str()).and_then(parse_date_string))
}

fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    tracing::debug!("Ignoring unparseable date {:?}", s);
    None
}
