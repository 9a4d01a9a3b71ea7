//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path as UrlPath, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use folio_content::ContentSource;
use folio_dom::DomError;
use folio_static::{
    AssetPipeline, FileStore, HostPage, PageContext, RenderConfig, RenderError, Renderer,
    TemplateEngine, Theme, ThemeController,
};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Content document to render and watch
    pub content: ContentSource,

    /// Site title
    pub title: String,

    /// Extra stylesheets, served under `/assets/`
    pub styles: Vec<PathBuf>,

    /// Directory of resume files, served under its own name
    pub resume_dir: Option<PathBuf>,

    /// Saved theme preference file
    pub theme_store: Option<PathBuf>,

    /// Renderer settings
    pub render: RenderConfig,

    /// Width below which the navigation collapses
    pub breakpoint_px: u32,

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
            content: ContentSource::File(PathBuf::from("content.json")),
            title: "Portfolio".to_string(),
            styles: vec![],
            resume_dir: None,
            theme_store: None,
            render: RenderConfig::default(),
            breakpoint_px: 768,
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Failed to build page skeleton: {0}")]
    SkeletonError(#[from] DomError),

    #[error("Render error: {0}")]
    RenderError(#[from] RenderError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    renderer: Renderer<ContentSource>,
    hmr: HmrHub,
    templates: TemplateEngine,
}

type SharedState = Arc<ServerState>;

impl ServerState {
    fn new(config: DevServerConfig) -> Result<Self, ServerError> {
        let skeleton = HostPage::standard(&config.title)?;
        let renderer = Renderer::new(config.render.clone(), config.content.clone(), skeleton)?;

        Ok(Self {
            config,
            renderer,
            hmr: HmrHub::new(),
            templates: TemplateEngine::new(),
        })
    }

    /// Theme saved by `folio theme`, read fresh so changes apply on reload.
    fn current_theme(&self) -> Theme {
        let Some(path) = &self.config.theme_store else {
            return Theme::default();
        };

        match ThemeController::new(FileStore::new(path), None) {
            Ok(controller) => controller.current(),
            Err(e) => {
                tracing::warn!("Ignoring theme preference: {}", e);
                Theme::default()
            }
        }
    }

    async fn render_index(&self) -> Result<String, ServerError> {
        let styles = self
            .config
            .styles
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| format!("/assets/{}", name.to_string_lossy()))
            .collect();

        let page = PageContext {
            title: self.config.title.clone(),
            body: self.renderer.page_html().await,
            theme: self.current_theme(),
            base_url: "/".to_string(),
            styles,
            breakpoint_px: self.config.breakpoint_px,
            scripts: vec!["/__hmr.js".to_string()],
        };

        self.templates
            .render_page(&page)
            .map_err(|e| ServerError::TemplateError(e.to_string()))
    }

    fn is_content(&self, path: &Path) -> bool {
        let Some(content) = self.config.content.path() else {
            return false;
        };

        match (content.canonicalize(), path.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => content.file_name() == path.file_name(),
        }
    }

    fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.config.content.path().into_iter().cloned().collect();
        paths.extend(self.config.styles.iter().cloned());
        paths.extend(self.config.resume_dir.iter().cloned());
        paths
    }
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let state = Arc::new(ServerState::new(self.config.clone())?);

        // Serve the skeleton even if the first render fails
        if let Err(e) = state.renderer.initialize().await {
            tracing::warn!("Initial render failed: {}", e);
        }

        let (watcher, mut rx) = FileWatcher::new(&state.watch_paths())
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::debug!("Could not open browser: {}", e);
            }
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

fn router(state: SharedState) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/assets/main.css", get(css_handler))
        .route("/assets/main.js", get(js_handler))
        .route("/assets/{name}", get(style_handler))
        .route("/__hmr", get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler));

    if let Some(dir) = &state.config.resume_dir {
        if let Some(name) = dir.file_name() {
            let mount = format!("/{}", name.to_string_lossy());
            app = app.nest_service(&mount, ServeDir::new(dir));
        }
    }

    app.with_state(state)
}

/// Handle file watch events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    match event {
        WatchEvent::ContentModified(path) if state.is_content(&path) => {
            tracing::info!("Content modified: {}", path.display());

            match state.renderer.refresh().await {
                Ok(report) => {
                    tracing::debug!("Refreshed {} sections", report.sections);
                    state.hmr.send(HmrMessage::UpdateContent {
                        html: state.renderer.page_html().await,
                    });
                }
                Err(RenderError::InFlight) => {
                    tracing::debug!("Refresh already running, skipping");
                }
                Err(e) => {
                    tracing::warn!("Failed to refresh content: {}", e);
                    state.hmr.send(HmrMessage::RenderFailed {
                        message: e.to_string(),
                    });
                }
            }
        }

        WatchEvent::StyleModified(path) => {
            tracing::info!("Stylesheet modified: {}", path.display());
            state.hmr.send(HmrMessage::UpdateStyles);
        }

        other => {
            tracing::debug!("File changed: {}", other.path().display());
            state.hmr.send(HmrMessage::Reload);
        }
    }
}

/// Handler for the index page.
async fn index_handler(State(state): State<SharedState>) -> Response {
    match state.render_index().await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn css_handler(State(state): State<SharedState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        AssetPipeline::generate_css(state.config.breakpoint_px),
    )
}

async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        AssetPipeline::generate_js(),
    )
}

/// Serve a configured stylesheet by file name.
async fn style_handler(
    State(state): State<SharedState>,
    UrlPath(name): UrlPath<String>,
) -> Response {
    let Some(path) = state
        .config
        .styles
        .iter()
        .find(|p| p.file_name().is_some_and(|f| f.to_string_lossy() == name))
    else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read_to_string(path).await {
        Ok(css) => ([(header::CONTENT_TYPE, "text/css")], css).into_response(),
        Err(e) => {
            tracing::warn!("Failed to read stylesheet {}: {}", path.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward hub messages to one client until it disconnects.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = state.hmr.subscribe();

    if !send_message(&mut socket, &HmrMessage::Connected).await {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if !send_message(&mut socket, &msg).await {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> bool {
    let Ok(json) = serde_json::to_string(msg) else {
        return false;
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handler for the live reload client script.
async fn hmr_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        hmr_client_script("/__hmr"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CONTENT: &str = r#"{ "sections": [
        { "section": "about", "title": "About", "type": "pg", "body": "Hello" }
    ] }"#;

    fn state_in(root: &Path) -> SharedState {
        let content = root.join("content.json");
        fs::write(&content, CONTENT).unwrap();

        Arc::new(
            ServerState::new(DevServerConfig {
                content: ContentSource::File(content),
                title: "Dev Site".to_string(),
                open: false,
                ..Default::default()
            })
            .unwrap(),
        )
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.breakpoint_px, 768);
    }

    #[tokio::test]
    async fn serves_rendered_page_with_reload_script() {
        let temp = tempdir().unwrap();
        let state = state_in(temp.path());
        state.renderer.initialize().await.unwrap();

        let response = index_handler(State(Arc::clone(&state))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("<title>Dev Site</title>"));
        assert!(html.contains(r#"id="about-section""#));
        assert!(html.contains(r#"<script src="/__hmr.js"></script>"#));
    }

    #[tokio::test]
    async fn uses_saved_theme() {
        let temp = tempdir().unwrap();
        let prefs = temp.path().join("prefs.json");
        fs::write(&prefs, r#"{ "theme": "dark" }"#).unwrap();

        let content = temp.path().join("content.json");
        fs::write(&content, CONTENT).unwrap();
        let state = ServerState::new(DevServerConfig {
            content: ContentSource::File(content),
            theme_store: Some(prefs),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(state.current_theme(), Theme::Dark);
        assert!(state.render_index().await.unwrap().contains(r#"data-theme="dark""#));
    }

    #[tokio::test]
    async fn content_change_pushes_new_html() {
        let temp = tempdir().unwrap();
        let state = state_in(temp.path());
        state.renderer.initialize().await.unwrap();
        let mut rx = state.hmr.subscribe();

        let content = temp.path().join("content.json");
        fs::write(
            &content,
            r#"{ "sections": [ { "section": "work", "title": "Work", "type": "pg", "body": "x" } ] }"#,
        )
        .unwrap();

        handle_watch_event(&state, WatchEvent::ContentModified(content)).await;

        match rx.try_recv().unwrap() {
            HmrMessage::UpdateContent { html } => {
                assert!(html.contains(r#"id="work-section""#));
                assert!(!html.contains("about-section"));
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_refresh_keeps_page() {
        let temp = tempdir().unwrap();
        let state = state_in(temp.path());
        state.renderer.initialize().await.unwrap();
        let mut rx = state.hmr.subscribe();

        let content = temp.path().join("content.json");
        fs::write(&content, "{ not json").unwrap();

        handle_watch_event(&state, WatchEvent::ContentModified(content)).await;

        assert!(matches!(rx.try_recv().unwrap(), HmrMessage::RenderFailed { .. }));
        assert!(state.renderer.page_html().await.contains("about-section"));
    }

    #[tokio::test]
    async fn other_changes_broadcast_reload_or_styles() {
        let temp = tempdir().unwrap();
        let state = state_in(temp.path());
        let mut rx = state.hmr.subscribe();

        handle_watch_event(&state, WatchEvent::StyleModified(PathBuf::from("site.css"))).await;
        handle_watch_event(&state, WatchEvent::ContentModified(temp.path().join("prefs.json")))
            .await;

        assert_eq!(rx.try_recv().unwrap(), HmrMessage::UpdateStyles);
        assert_eq!(rx.try_recv().unwrap(), HmrMessage::Reload);
    }

    #[tokio::test]
    async fn serves_configured_stylesheets_only() {
        let temp = tempdir().unwrap();
        let style = temp.path().join("custom.css");
        fs::write(&style, "body { color: red; }").unwrap();

        let content = temp.path().join("content.json");
        fs::write(&content, CONTENT).unwrap();
        let state = Arc::new(
            ServerState::new(DevServerConfig {
                content: ContentSource::File(content),
                styles: vec![style],
                ..Default::default()
            })
            .unwrap(),
        );

        let found = style_handler(State(Arc::clone(&state)), UrlPath("custom.css".to_string())).await;
        assert_eq!(found.status(), StatusCode::OK);
        assert!(body_text(found).await.contains("color: red"));

        let missing = style_handler(State(state), UrlPath("other.css".to_string())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
