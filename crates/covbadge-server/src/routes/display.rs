//! `GET /display?repo=<name>`

use super::RepoQuery;
use crate::config::DisplayMode;
use crate::error::ServerResult;
use crate::server::{blocking, AppState};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use covbadge::Badge;
use std::sync::Arc;
use tracing::{debug, info};

/// Serve the badge for a repository's stored profile
///
/// Without a repository the client is sent to the `NaN` badge and
/// storage is never touched.
pub async fn display(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoQuery>,
) -> ServerResult<Response> {
    let Some(repo) = query.repo_name()? else {
        let url = state.badge_url(&Badge::unknown());
        debug!(url = %url, "display without repo");
        return Ok(Redirect::to(&url).into_response());
    };

    let coverage = {
        let state = Arc::clone(&state);
        let repo = repo.clone();
        blocking(move || state.measure(&repo)).await?
    };

    let badge = Badge::for_coverage(&coverage);
    let url = state.badge_url(&badge);
    info!(
        repo = %repo,
        percent = coverage.rounded_percent(),
        color = %badge.color(),
        mode = ?state.display_mode(),
        "display badge"
    );

    match state.display_mode() {
        DisplayMode::Redirect => Ok(Redirect::to(&url).into_response()),
        DisplayMode::Proxy => {
            let rendered = state.renderer().render(&url).await?;
            Ok(([(header::CONTENT_TYPE, rendered.content_type)], rendered.body).into_response())
        }
    }
}
