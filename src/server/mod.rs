//! HTTP server: routes, theme persistence and the not-found fallback
//!
//! Every request builds a fresh view, fetches from the [`PostSource`] and
//! renders. Nothing is cached between requests.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cms::{CmsClient, PostSource};
use crate::helpers::post_path;
use crate::templates::{PLACEHOLDER_IMAGE_PATH, PLACEHOLDER_IMAGE_SVG};
use crate::view::{DetailView, ListView, Page, PageRenderer};
use crate::Kitchen;

/// Shared server state
pub struct AppState<S> {
    source: S,
    pages: PageRenderer,
}

impl<S: PostSource> AppState<S> {
    pub fn new(source: S, pages: PageRenderer) -> Self {
        Self { source, pages }
    }

    /// Theme for this visitor, from the preference cookie
    fn theme<'a>(&'a self, jar: &'a CookieJar) -> &'a str {
        let themes = self.pages.themes();
        themes.resolve(jar.get(themes.storage_key()).map(|c| c.value()))
    }
}

/// Build the router for a post source
pub fn router<S: PostSource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(list_handler::<S>))
        .route("/post/:slug", get(detail_handler::<S>))
        .route("/theme/:name", get(theme_handler::<S>))
        .route(PLACEHOLDER_IMAGE_PATH, get(placeholder_handler))
        .fallback(not_found_handler::<S>)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server against the configured CMS
pub async fn start(kitchen: &Kitchen, ip: &str, port: u16) -> Result<()> {
    let source = CmsClient::new(&kitchen.config.cms)?;
    tracing::debug!("Querying posts from {}", source.endpoint());
    if kitchen.config.cms.token.is_none() {
        tracing::info!(
            "No CMS token in ${}, only public documents will be visible",
            kitchen.config.cms.token_env
        );
    }

    let pages = PageRenderer::new(kitchen.config.clone())?;
    let app = router(Arc::new(AppState::new(source, pages)));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn list_handler<S: PostSource>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
) -> Response {
    let mut view = ListView::new();
    view.load(&state.source).await;
    respond(view.render(&state.pages.context(state.theme(&jar), "/", true)))
}

async fn detail_handler<S: PostSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Response {
    let path = post_path(&slug);
    let mut view = DetailView::new(slug);
    view.load(&state.source).await;
    respond(view.render(&state.pages.context(state.theme(&jar), &path, true)))
}

#[derive(Debug, Deserialize)]
struct ThemeQuery {
    to: Option<String>,
}

/// Persist a theme choice and send the visitor back where they were
async fn theme_handler<S: PostSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
    Query(query): Query<ThemeQuery>,
    jar: CookieJar,
) -> Response {
    let back = return_path(query.to.as_deref());
    let themes = state.pages.themes();

    if !themes.is_known(&name) {
        tracing::warn!("Ignoring request for unknown theme {:?}", name);
        return Redirect::to(back).into_response();
    }

    tracing::debug!("Switching theme to {:?}", name);
    let cookie = Cookie::build((themes.storage_key().to_string(), name))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent();
    (jar.add(cookie), Redirect::to(back)).into_response()
}

async fn placeholder_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        PLACEHOLDER_IMAGE_SVG,
    )
}

async fn not_found_handler<S: PostSource>(
    State(state): State<Arc<AppState<S>>>,
    uri: Uri,
    jar: CookieJar,
) -> Response {
    tracing::debug!("No route for {}", uri.path());
    let ctx = state.pages.context(state.theme(&jar), uri.path(), true);
    respond(ctx.not_found_page(
        "Page Not Found",
        "The page you're looking for doesn't exist.",
    ))
}

fn respond(page: Result<Page>) -> Response {
    match page {
        Ok(page) => (page.status, Html(page.html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Only same-site absolute paths are followed after a theme switch
fn return_path(to: Option<&str>) -> &str {
    match to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}
