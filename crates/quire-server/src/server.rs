//! Development server implementation.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path as UrlPath, State,
    },
    handler::Handler,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use quire_content::{slug_segments, BlogError, BlogStore, ContentSource, DocsDir};
use quire_nav::NavigationCatalog;
use quire_static::{AssetPipeline, Layout, SiteRenderer};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, hmr_url, HmrHub, HmrMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory containing docs
    pub docs_dir: PathBuf,

    /// Blog posts dataset
    pub blog_posts: Option<PathBuf>,

    /// Directory served at the site root
    pub public_dir: Option<PathBuf>,

    /// Site title
    pub title: String,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("content/docs"),
            blog_posts: None,
            public_dir: None,
            title: "Documentation".to_string(),
            port: 3000,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Failed to load blog posts: {0}")]
    BlogError(#[from] BlogError),
}

/// Shared server state.
pub struct ServerState {
    renderer: SiteRenderer,
    docs: Box<dyn ContentSource>,
    blog: BlogStore,
    hmr: HmrHub,
    hmr_url: String,
    css: String,
}

impl ServerState {
    /// Create server state from its parts.
    pub fn new(
        renderer: SiteRenderer,
        docs: Box<dyn ContentSource>,
        blog: BlogStore,
        hmr_url: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            docs,
            blog,
            hmr: HmrHub::new(),
            hmr_url: hmr_url.into(),
            css: AssetPipeline::css(false),
        }
    }

    /// The live reload hub.
    pub fn hmr(&self) -> &HmrHub {
        &self.hmr
    }
}

/// State handle shared by all handlers.
pub type SharedState = Arc<RwLock<ServerState>>;

/// Build the site router.
///
/// Docs and blog pages are rendered from source on every request. Requests
/// that match nothing are served from `public_dir` when it is set, and get
/// the not-found page otherwise.
pub fn router(state: SharedState, public_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/", get(|| async { Redirect::temporary("/docs") }))
        .route("/docs", get(doc_index_handler))
        .route("/docs/{*slug}", get(doc_handler))
        .route("/blog", get(blog_index_handler))
        .route("/blog/{slug}", get(blog_post_handler))
        .route("/assets/main.css", get(css_handler))
        .route("/assets/main.js", get(js_handler))
        .route("/__hmr", get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler));

    let router = match public_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).not_found_service(not_found_handler.with_state(Arc::clone(&state))),
        ),
        None => router.fallback(not_found_handler),
    };

    router.with_state(state)
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
    catalog: Arc<NavigationCatalog>,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig, catalog: Arc<NavigationCatalog>) -> Self {
        Self { config, catalog }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let blog_posts = self.config.blog_posts.as_deref().map(canonical);
        let blog = match &blog_posts {
            Some(path) if path.is_file() => BlogStore::load(path)?,
            Some(path) => {
                tracing::warn!("Blog posts not found: {}", path.display());
                BlogStore::new()
            }
            None => BlogStore::new(),
        };

        let layout = Layout::new(self.config.title.clone()).with_script("/__hmr.js");
        let state = Arc::new(RwLock::new(ServerState::new(
            SiteRenderer::new(Arc::clone(&self.catalog), layout),
            Box::new(DocsDir::new(&self.config.docs_dir)),
            blog,
            hmr_url(&self.config.host, self.config.port),
        )));

        let mut watch_paths = vec![canonical(&self.config.docs_dir)];
        if let Some(parent) = blog_posts.as_deref().and_then(Path::parent) {
            watch_paths.push(parent.to_path_buf());
        }
        if let Some(public_dir) = &self.config.public_dir {
            watch_paths.push(canonical(public_dir));
        }

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event, blog_posts.as_deref()).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, self.config.public_dir.as_deref());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        let url = format!("http://{}/docs", addr);
        tracing::info!("Dev server running at {}", url);

        if self.config.open {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Handle file watch events.
///
/// A change to the blog dataset reloads it first. A dataset that no longer
/// parses leaves the previous posts in place.
async fn handle_watch_event(state: &SharedState, event: WatchEvent, blog_posts: Option<&Path>) {
    if let Some(dataset) = blog_posts.filter(|dataset| event.path() == *dataset) {
        if !matches!(event, WatchEvent::Deleted(_)) {
            match BlogStore::load(dataset) {
                Ok(blog) => {
                    tracing::info!("Reloaded {} blog posts", blog.len());
                    state.write().await.blog = blog;
                }
                Err(e) => tracing::warn!("Keeping previous blog posts: {}", e),
            }
        }
    }

    match &event {
        WatchEvent::ContentModified(path) => {
            tracing::info!("Content modified: {}", path.display())
        }
        WatchEvent::DataModified(path) => tracing::info!("Data modified: {}", path.display()),
        WatchEvent::Created(path) => tracing::debug!("Created: {}", path.display()),
        WatchEvent::Deleted(path) => tracing::debug!("Deleted: {}", path.display()),
        WatchEvent::Modified(path) => tracing::debug!("Modified: {}", path.display()),
    }

    state.read().await.hmr.send(HmrMessage::Reload);
}

/// Turn a render result into a response.
fn html_response<E: Display>(status: StatusCode, result: Result<String, E>) -> Response {
    match result {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

fn not_found_page(state: &ServerState) -> Response {
    html_response(StatusCode::NOT_FOUND, state.renderer.render_not_found())
}

async fn render_doc(state: &SharedState, slug: &str) -> Response {
    let state = state.read().await;

    match state.docs.load_doc(&slug_segments(slug)) {
        Some(source) => html_response(StatusCode::OK, state.renderer.render_doc(slug, &source)),
        None => not_found_page(&state),
    }
}

/// Handler for the docs index page.
async fn doc_index_handler(State(state): State<SharedState>) -> Response {
    render_doc(&state, "").await
}

/// Handler for docs pages below the index.
async fn doc_handler(State(state): State<SharedState>, UrlPath(slug): UrlPath<String>) -> Response {
    render_doc(&state, slug.trim_end_matches('/')).await
}

/// Handler for the blog index.
async fn blog_index_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    html_response(
        StatusCode::OK,
        state.renderer.render_blog_index(state.blog.posts()),
    )
}

/// Handler for a single blog post.
async fn blog_post_handler(
    State(state): State<SharedState>,
    UrlPath(slug): UrlPath<String>,
) -> Response {
    let state = state.read().await;

    match state.blog.get(&slug) {
        Some(post) => html_response(StatusCode::OK, state.renderer.render_post(post)),
        None => not_found_page(&state),
    }
}

/// Handler for anything no route matched.
async fn not_found_handler(State(state): State<SharedState>) -> Response {
    not_found_page(&*state.read().await)
}

async fn css_handler(State(state): State<SharedState>) -> Response {
    let css = state.read().await.css.clone();
    ([(header::CONTENT_TYPE, "text/css")], css).into_response()
}

async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        AssetPipeline::js(),
    )
}

/// Handler for the HMR client script.
async fn hmr_script_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let script = hmr_client_script(&state.read().await.hmr_url);
    ([(header::CONTENT_TYPE, "application/javascript")], script)
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = state.read().await.hmr.subscribe();

    if send_message(&mut socket, &HmrMessage::Connected)
        .await
        .is_err()
    {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_message(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use quire_content::MemorySource;
    use quire_nav::{DocGroup, DocPage};
    use std::fs;
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn state() -> SharedState {
        let catalog = NavigationCatalog::new(vec![
            DocGroup::new(
                "Getting Started",
                vec![
                    DocPage::new("", "Introduction"),
                    DocPage::new("getting-started", "Getting Started"),
                ],
            ),
            DocGroup::new("Help", vec![DocPage::new("help/faq", "FAQ")]),
        ])
        .unwrap();

        let docs = MemorySource::new()
            .with_file("index.md", "---\ntitle: \"Welcome\"\n---\n# Welcome")
            .with_file("help/faq.md", "# FAQ\n\n<Note>Ask us</Note>");

        let blog = BlogStore::from_json(
            r#"{ "launch": { "title": "Launch day", "content": "Hello\n\n## More" } }"#,
        )
        .unwrap();

        let layout = Layout::new("Acme").with_script("/__hmr.js");

        Arc::new(RwLock::new(ServerState::new(
            SiteRenderer::new(Arc::new(catalog), layout),
            Box::new(docs),
            blog,
            hmr_url("127.0.0.1", 3000),
        )))
    }

    async fn get(path: &str) -> (StatusCode, String) {
        let response = router(state(), None)
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn serves_docs_index() {
        let (status, body) = get("/docs").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Welcome - Acme</title>"));
        assert!(body.contains("__hmr.js"));
    }

    #[tokio::test]
    async fn serves_nested_docs_page() {
        let (status, body) = get("/docs/help/faq").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<strong>Note:</strong> Ask us"));
        assert!(body.contains("pager-prev"));
    }

    #[tokio::test]
    async fn missing_doc_is_not_found() {
        let (status, body) = get("/docs/getting-started").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn serves_blog() {
        let (status, body) = get("/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Launch day"));

        let (status, body) = get("/blog/launch").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>More</h2>"));

        let (status, _) = get("/blog/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_assets() {
        let response = router(state(), None)
            .oneshot(
                Request::builder()
                    .uri("/assets/main.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

        let (status, body) = get("/__hmr.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("ws://127.0.0.1:3000/__hmr"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, body) = get("/nothing/here").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn root_redirects_to_docs() {
        let response = router(state(), None)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/docs");
    }

    #[tokio::test]
    async fn serves_public_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("robots.txt"), "User-agent: *").unwrap();

        let app = router(state(), Some(temp.path()));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/robots.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/missing.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dataset_change_reloads_blog() {
        let temp = tempdir().unwrap();
        let dataset = temp.path().join("posts.json");
        fs::write(
            &dataset,
            r#"{ "a": { "title": "A", "content": "x" }, "b": { "title": "B", "content": "y" } }"#,
        )
        .unwrap();

        let state = state();
        let mut rx = state.read().await.hmr().subscribe();

        handle_watch_event(
            &state,
            WatchEvent::DataModified(dataset.clone()),
            Some(&dataset),
        )
        .await;

        assert_eq!(state.read().await.blog.len(), 2);
        assert_eq!(rx.try_recv().unwrap(), HmrMessage::Reload);
    }

    #[tokio::test]
    async fn broken_dataset_keeps_previous_posts() {
        let temp = tempdir().unwrap();
        let dataset = temp.path().join("posts.json");
        fs::write(&dataset, "{ not json").unwrap();

        let state = state();

        handle_watch_event(
            &state,
            WatchEvent::DataModified(dataset.clone()),
            Some(&dataset),
        )
        .await;

        assert!(state.read().await.blog.get("launch").is_some());
    }

    #[tokio::test]
    async fn content_change_only_reloads_browser() {
        let state = state();
        let mut rx = state.read().await.hmr().subscribe();

        handle_watch_event(
            &state,
            WatchEvent::ContentModified(PathBuf::from("docs/index.md")),
            None,
        )
        .await;

        assert_eq!(rx.try_recv().unwrap(), HmrMessage::Reload);
        assert_eq!(state.read().await.blog.len(), 1);
    }
}
