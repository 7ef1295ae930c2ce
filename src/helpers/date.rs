//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date the way post bylines show it (like "January 5, 2024")
pub fn display_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%B %-d, %Y").to_string()
}

/// Format a date for a `datetime` attribute
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Pick the date a post is shown with: published date first, then creation date
pub fn byline_date<Tz: TimeZone>(
    published: Option<&DateTime<Tz>>,
    created: Option<&DateTime<Tz>>,
) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    published.or(created).map(display_date)
}
