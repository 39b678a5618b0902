//! HTTP service wiring
//!
//! ```text
//! POST /upload?repo=<name>   store a profile, redirect to its badge
//! GET  /display?repo=<name>  serve the badge for the stored profile
//! GET  /health               liveness probe
//! ```

use crate::config::{DisplayMode, ServerConfig};
use crate::error::{ServerError, ServerResult};
use crate::routes;
use crate::shield::{BadgeRenderer, ShieldClient};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use covbadge::{
    Badge, Coverage, FsProfileStore, ProfileParser, ProfileStore, RepoName, Selection,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

/// State shared across HTTP handlers
pub struct AppState {
    store: Arc<dyn ProfileStore>,
    renderer: Arc<dyn BadgeRenderer>,
    parser: ProfileParser,
    shield_url: String,
    selection: Selection,
    display_mode: DisplayMode,
    max_upload_bytes: usize,
    request_timeout: Duration,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("shield_url", &self.shield_url)
            .field("selection", &self.selection)
            .field("display_mode", &self.display_mode)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state from configuration and its two collaborators
    #[must_use]
    pub fn new(
        config: &ServerConfig,
        store: Arc<dyn ProfileStore>,
        renderer: Arc<dyn BadgeRenderer>,
    ) -> Self {
        Self {
            store,
            renderer,
            parser: ProfileParser::new(),
            shield_url: config.shield_url().to_string(),
            selection: config.aggregation,
            display_mode: config.display_mode,
            max_upload_bytes: config.max_upload_bytes,
            request_timeout: config.request_timeout(),
        }
    }

    /// Badge service base URL
    #[must_use]
    pub fn shield_url(&self) -> &str {
        &self.shield_url
    }

    /// Configured `/display` behaviour
    #[must_use]
    pub const fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub(crate) fn renderer(&self) -> &dyn BadgeRenderer {
        self.renderer.as_ref()
    }

    /// URL of `badge` on the badge service
    #[must_use]
    pub fn badge_url(&self, badge: &Badge) -> String {
        badge.url(&self.shield_url)
    }

    /// Persist an upload, then measure it
    ///
    /// The profile is stored even when it fails to parse.
    pub fn store_and_measure(&self, repo: &RepoName, contents: &[u8]) -> ServerResult<Coverage> {
        self.store.save(repo, contents)?;
        self.measure_bytes(contents)
    }

    /// Measure the stored profile of `repo`
    pub fn measure(&self, repo: &RepoName) -> ServerResult<Coverage> {
        let contents = self.store.load(repo)?;
        self.measure_bytes(&contents)
    }

    fn measure_bytes(&self, contents: &[u8]) -> ServerResult<Coverage> {
        let report = self.parser.parse_reader(contents)?;
        Ok(report.coverage(self.selection)?)
    }
}

/// Run a blocking store/parse step off the async workers
pub(crate) async fn blocking<T, F>(task: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ServerResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(ServerError::from)?
}

/// Build the router with every layer applied
pub fn router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.max_upload_bytes;
    let request_timeout = state.request_timeout;

    Router::new()
        .route("/upload", post(routes::upload))
        .route("/display", get(routes::display))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Bind and serve until interrupted
pub async fn serve(config: ServerConfig) -> ServerResult<()> {
    let addr = config.socket_addr()?;
    let store: Arc<dyn ProfileStore> = Arc::new(FsProfileStore::new(&config.storage_dir));
    let renderer: Arc<dyn BadgeRenderer> = Arc::new(ShieldClient::new(config.shield_timeout())?);
    let app = router(Arc::new(AppState::new(&config, store, renderer)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        shield = config.shield_url(),
        storage = %config.storage_dir.display(),
        aggregation = %config.aggregation,
        display_mode = ?config.display_mode,
        "covbadge listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("covbadge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
