//! HTTP endpoint handlers

mod display;
mod health;
mod upload;

pub use display::display;
pub use health::health;
pub use upload::upload;

use crate::error::ServerResult;
use covbadge::RepoName;
use serde::Deserialize;

/// `?repo=` query shared by `/upload` and `/display`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoQuery {
    /// Raw repository name
    pub repo: Option<String>,
}

impl RepoQuery {
    /// Validated repository, `None` when absent or empty
    pub fn repo_name(&self) -> ServerResult<Option<RepoName>> {
        match self.repo.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => Ok(Some(RepoName::new(raw)?)),
        }
    }
}
