//! HTTP client for the CMS query API

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::error::FetchError;
use super::query::{self, POSTS_QUERY, POST_BY_SLUG_QUERY};
use crate::config::CmsConfig;
use crate::content::Post;
use crate::helpers::truncate;

/// Where posts come from.
///
/// The views, the server and the static generator only talk to this trait,
/// so they can run against the live CMS or an in-memory source.
pub trait PostSource: Send + Sync {
    /// All posts with a slug, newest first
    fn list_posts(&self) -> impl Future<Output = Result<Vec<Post>, FetchError>> + Send;

    /// The post with the given slug, `None` when no document matches
    fn get_post_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Post>, FetchError>> + Send;
}

/// Response envelope of the query API
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    #[serde(default = "Option::default")]
    result: Option<T>,
}

/// Client for the CMS query API
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl CmsClient {
    /// Create a client for the configured project and dataset
    pub fn new(config: &CmsConfig) -> Result<Self, FetchError> {
        if config.project_id.trim().is_empty() {
            return Err(FetchError::NotConfigured(
                "cms.project_id is empty".to_string(),
            ));
        }
        if config.dataset.trim().is_empty() {
            return Err(FetchError::NotConfigured("cms.dataset is empty".to_string()));
        }
        Self::with_endpoint(config, query::query_endpoint(config))
    }

    /// Create a client against an explicit query endpoint
    pub fn with_endpoint(config: &CmsConfig, endpoint: String) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("kitchen-rs/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout.max(1)))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a query and decode the `result` field of the response
    async fn fetch<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, Value)],
    ) -> Result<Option<T>, FetchError> {
        let mut request = self
            .http
            .get(&self.endpoint)
            .query(&query::query_params(groq, params));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: QueryResponse<T> =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;
        Ok(envelope.result)
    }
}

impl PostSource for CmsClient {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        tracing::debug!("Querying post list from {}", self.endpoint);
        let posts: Option<Vec<Post>> = self.fetch(POSTS_QUERY, &[]).await?;
        let posts = posts.ok_or_else(|| {
            FetchError::Malformed("post list query returned no result".to_string())
        })?;
        tracing::debug!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, FetchError> {
        tracing::debug!("Querying post {:?}", slug);
        self.fetch(
            POST_BY_SLUG_QUERY,
            &[("slug", Value::String(slug.to_string()))],
        )
        .await
    }
}

/// Extract a readable message from an error response body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/description")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| truncate(body.trim(), 200, "..."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{header::AUTHORIZATION, HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    use crate::test_support::{post_json, sample_body};

    async fn fake_query(
        Query(params): Query<HashMap<String, String>>,
        headers: AxumHeaders,
    ) -> (StatusCode, String) {
        let authorized = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "Bearer test-token")
            .unwrap_or(false);
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                r#"{"error":{"description":"Unauthorized - Session not found"}}"#.to_string(),
            );
        }
        if !params.get("query").map(|q| q.contains("_type == \"post\"")).unwrap_or(false) {
            return (StatusCode::BAD_REQUEST, "missing query".to_string());
        }

        match params.get("$slug").map(String::as_str) {
            None => (
                StatusCode::OK,
                serde_json::json!({
                    "ms": 3,
                    "result": [post_json("b", "Second", sample_body()), post_json("a", "First", sample_body())]
                })
                .to_string(),
            ),
            Some(r#""a""#) => (
                StatusCode::OK,
                serde_json::json!({ "result": post_json("a", "First", sample_body()) }).to_string(),
            ),
            Some(r#""broken""#) => (StatusCode::OK, "<html>not json</html>".to_string()),
            Some(r#""boom""#) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"error":{"description":"query exploded"}}"#.to_string(),
            ),
            Some(_) => (StatusCode::OK, r#"{"ms":1,"result":null}"#.to_string()),
        }
    }

    async fn spawn_fake_cms() -> String {
        let app = Router::new().route("/v1/data/query/test", get(fake_query));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/data/query/test", addr)
    }

    fn client(endpoint: String, token: Option<&str>) -> CmsClient {
        let config = CmsConfig {
            project_id: "test".to_string(),
            token: token.map(str::to_string),
            ..CmsConfig::default()
        };
        CmsClient::with_endpoint(&config, endpoint).unwrap()
    }

    #[test]
    fn test_new_requires_project() {
        let err = CmsClient::new(&CmsConfig::default()).unwrap_err();
        assert!(matches!(err, FetchError::NotConfigured(_)));
    }

    #[test]
    fn test_new_uses_derived_endpoint() {
        let config = CmsConfig {
            project_id: "abc123".to_string(),
            ..CmsConfig::default()
        };
        let client = CmsClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production"
        );
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"error":{"description":"bad query"}}"#),
            "bad query"
        );
        assert_eq!(error_message(r#"{"message":"nope"}"#), "nope");
        assert_eq!(error_message("  plain text  "), "plain text");
    }

    #[tokio::test]
    async fn test_list_posts_keeps_query_order() {
        let endpoint = spawn_fake_cms().await;
        let posts = client(endpoint, Some("test-token")).list_posts().await.unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert_eq!(posts[0].title, "Second");
        assert!(!posts[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_get_post_by_slug() {
        let endpoint = spawn_fake_cms().await;
        let client = client(endpoint, Some("test-token"));

        let post = client.get_post_by_slug("a").await.unwrap().unwrap();
        assert_eq!(post.title, "First");

        let missing = client.get_post_by_slug("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failures_are_distinguishable() {
        let endpoint = spawn_fake_cms().await;
        let authed = client(endpoint.clone(), Some("test-token"));

        match authed.get_post_by_slug("boom").await {
            Err(FetchError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "query exploded");
            }
            other => panic!("expected status error, got {:?}", other),
        }

        assert!(matches!(
            authed.get_post_by_slug("broken").await,
            Err(FetchError::Malformed(_))
        ));

        match client(endpoint, None).list_posts().await {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Bind then drop a listener so the port is closed
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}/q", addr), None)
            .list_posts()
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
