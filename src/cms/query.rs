//! GROQ queries and query endpoint construction

use crate::config::CmsConfig;

/// All posts that have a slug, newest first
pub const POSTS_QUERY: &str = r#"*[_type == "post" && defined(slug.current)] | order(_createdAt desc) {
  "id": _id,
  title,
  slug,
  "author": author->name,
  body,
  publishedAt,
  _createdAt
}"#;

/// One post by slug; takes a `$slug` parameter
pub const POST_BY_SLUG_QUERY: &str = r#"*[_type == "post" && slug.current == $slug][0] {
  "id": _id,
  title,
  slug,
  "author": author->name,
  body,
  publishedAt,
  _createdAt
}"#;

/// Query endpoint for a project/dataset
///
/// # Examples
/// ```ignore
/// query_endpoint(&config) // -> "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production"
/// ```
pub fn query_endpoint(config: &CmsConfig) -> String {
    let host = if config.use_cdn { "apicdn" } else { "api" };
    format!(
        "https://{}.{}.sanity.io/v{}/data/query/{}",
        config.project_id,
        host,
        config.api_version.trim_start_matches('v'),
        config.dataset
    )
}

/// Query string pairs for a query and its parameters.
///
/// Parameters are sent as `$name=<json value>`.
pub fn query_params(query: &str, params: &[(&str, serde_json::Value)]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len() + 1);
    pairs.push(("query".to_string(), query.to_string()));
    for (name, value) in params {
        pairs.push((format!("${}", name), value.to_string()));
    }
    pairs
}
