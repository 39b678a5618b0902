//! `POST /upload?repo=<name>`

use super::RepoQuery;
use crate::error::{ServerError, ServerResult};
use crate::server::{blocking, AppState};
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use covbadge::Badge;
use std::sync::Arc;
use tracing::{debug, info};

/// Store the uploaded profile and redirect to its badge
///
/// The first multipart part that carries a file name is the profile;
/// other parts are ignored.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Response> {
    let repo = query.repo_name()?.ok_or(ServerError::MissingRepo)?;
    let contents = first_file_part(multipart?).await?;
    debug!(repo = %repo, bytes = contents.len(), "received profile");

    let coverage = {
        let state = Arc::clone(&state);
        let repo = repo.clone();
        blocking(move || state.store_and_measure(&repo, &contents)).await?
    };

    let badge = Badge::for_coverage(&coverage);
    info!(
        repo = %repo,
        percent = coverage.rounded_percent(),
        color = %badge.color(),
        "profile uploaded"
    );
    Ok(Redirect::to(&state.badge_url(&badge)).into_response())
}

async fn first_file_part(mut multipart: Multipart) -> ServerResult<Bytes> {
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some_and(|name| !name.is_empty()) {
            return Ok(field.bytes().await?);
        }
    }
    Err(ServerError::MissingFile)
}
