//! HTTP server: three read-only views over the content tree
//!
//! Every handler re-reads the site config and the post collection, so a
//! content edit is visible on the next request without any invalidation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::content::PostLoader;
use crate::error::Error;
use crate::page::Page;
use crate::templates::TemplateRenderer;
use crate::App;

/// Shared server state, constructed once at startup
struct ServerState {
    app: App,
    templates: TemplateRenderer,
}

/// Build the application router
pub fn router(app: App) -> crate::Result<Router> {
    let templates = TemplateRenderer::new()?;
    let static_dir = app.static_dir.clone();
    let state = Arc::new(ServerState { app, templates });

    Ok(Router::new()
        .route("/", get(index))
        .route("/post/:slug", get(post))
        .route("/tag/:slug", get(tag))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(app: App, ip: &str, port: u16) -> anyhow::Result<()> {
    let router = router(app)?;

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// GET / - all publishable posts, newest first
async fn index(State(state): State<Arc<ServerState>>) -> Result<Html<String>, RequestError> {
    let site = state.app.load_site()?;
    let posts = PostLoader::new(&state.app).load_posts()?;
    let page = Page::listing(&site);

    let html = state.templates.render_index(&site, &page, &posts)?;
    Ok(Html(html))
}

/// GET /post/:slug - a single post, 404 when the slug matches nothing
async fn post(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, RequestError> {
    let site = state.app.load_site()?;
    let post = PostLoader::new(&state.app).find_post(&slug)?;
    let page = Page::single_post(&site, &post);

    let html = state.templates.render_post(&site, &page, &post)?;
    Ok(Html(html))
}

/// GET /tag/:slug - posts carrying the tag; an unused tag is an empty
/// listing, not an error
async fn tag(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, RequestError> {
    let site = state.app.load_site()?;
    let posts = PostLoader::new(&state.app).load_posts_by_tag(&slug)?;
    let page = Page::listing(&site);

    let html = state.templates.render_index(&site, &page, &posts)?;
    Ok(Html(html))
}

/// Maps loader/renderer errors onto HTTP responses. A missing slug is a
/// 404; everything else is a 500 with the detail kept in the log only.
struct RequestError(Error);

impl From<Error> for RequestError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::NotFound { slug } => {
                tracing::debug!("No post with slug {:?}", slug);
                (
                    StatusCode::NOT_FOUND,
                    Html("<h1>404</h1><p>There is no such post.</p>".to_string()),
                )
                    .into_response()
            }
            err => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>500</h1><p>Something went wrong.</p>".to_string()),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::fs;
    use tower::util::ServiceExt;

    const CONFIG: &str = r#"
title: Notebook
name: Phoebe
job_title: Engineer
email: p@example.com
description: Assorted notes
avatar: images/avatar.png
favicon: images/favicon.ico
twitter_handler: phoebe
analytics_code: ""
disqus: ""
pages: []
social_networks: []
show_tags: true
show_email: false
show_rss: false
show_comments: false
show_menu: false
fixed_sidebar: false
"#;

    fn fixture() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path());

        fs::create_dir_all(app.config_path.parent().unwrap()).unwrap();
        fs::write(&app.config_path, CONFIG).unwrap();

        fs::create_dir_all(&app.posts_dir).unwrap();
        fs::write(app.posts_dir.join("a.md"), "# A\n\nFirst body.").unwrap();
        fs::write(
            app.posts_dir.join("a.yml"),
            "title: First\ndate: 01/01/24 10:00\nimage: cover.png\nmarkdown_path: a.md\ntags: [go]\nshow_comments: false\nslug: a\ndraft: false\n",
        )
        .unwrap();
        fs::write(app.posts_dir.join("b.md"), "# B\n\nDraft body.").unwrap();
        fs::write(
            app.posts_dir.join("b.yml"),
            "title: Draft\ndate: 02/01/24 10:00\nimage: cover.png\nmarkdown_path: b.md\ntags: []\nshow_comments: false\nslug: b\ndraft: true\n",
        )
        .unwrap();

        (dir, app)
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_lists_published_posts() {
        let (_dir, app) = fixture();
        let router = router(app).unwrap();

        let (status, body) = get(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("First"));
        assert!(!body.contains("Draft body."));
    }

    #[tokio::test]
    async fn test_post_view() {
        let (_dir, app) = fixture();
        let router = router(app).unwrap();

        let (status, body) = get(&router, "/post/a").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("First body."));
        assert!(body.contains("<title>First | Notebook</title>"));
    }

    #[tokio::test]
    async fn test_missing_slug_is_404() {
        let (_dir, app) = fixture();
        let router = router(app).unwrap();

        let (status, _) = get(&router, "/post/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_draft_slug_is_404() {
        let (_dir, app) = fixture();
        let router = router(app).unwrap();

        let (status, _) = get(&router, "/post/b").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tag_listing_and_empty_tag() {
        let (_dir, app) = fixture();
        let router = router(app).unwrap();

        let (status, body) = get(&router, "/tag/go").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("First"));

        let (status, body) = get(&router, "/tag/rust").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Nothing here yet."));
    }

    #[tokio::test]
    async fn test_broken_config_is_500() {
        let (_dir, app) = fixture();
        fs::write(&app.config_path, "title: [unclosed").unwrap();
        let router = router(app).unwrap();

        let (status, body) = get(&router, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // No detail leaks to the client
        assert!(!body.contains("unclosed"));
    }
}
